use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoundcastError};
use crate::frame::RosterFrame;
use crate::types::{ServiceColor, ServiceSlot, Team};

// ---------------------------------------------------------------------------
// PaletteOverflow
// ---------------------------------------------------------------------------

/// What to do with a team that declares more services than the palette has
/// colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteOverflow {
    /// Reuse the palette from the start (`position mod 5`).
    #[default]
    Wrap,
    /// Refuse the whole roster.
    Reject,
}

impl PaletteOverflow {
    pub fn as_str(self) -> &'static str {
        match self {
            PaletteOverflow::Wrap => "wrap",
            PaletteOverflow::Reject => "reject",
        }
    }
}

// ---------------------------------------------------------------------------
// TeamRegistry
// ---------------------------------------------------------------------------

/// Write-once team/service identity model.
///
/// Starts empty. [`TeamRegistry::bootstrap`] fills it from the first roster
/// frame and every later call is a no-op.
#[derive(Debug, Default)]
pub struct TeamRegistry {
    teams: Vec<Team>,
    index: HashMap<String, usize>,
    established: bool,
}

impl TeamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_established(&self) -> bool {
        self.established
    }

    /// Populate the registry from a roster frame.
    ///
    /// Returns `Ok(true)` when the registry was established by this call and
    /// `Ok(false)` when the frame was ignored, either because the registry
    /// already exists or because the roster lists no teams.
    pub fn bootstrap(&mut self, roster: &RosterFrame, overflow: PaletteOverflow) -> Result<bool> {
        if self.established || roster.teams.is_empty() {
            return Ok(false);
        }

        let mut teams = Vec::with_capacity(roster.teams.len());
        for team in &roster.teams {
            let mut services = Vec::with_capacity(team.services.len());
            for (position, name) in team.services.iter().enumerate() {
                let color = match overflow {
                    PaletteOverflow::Wrap => ServiceColor::wrapping(position),
                    PaletteOverflow::Reject => ServiceColor::at(position).ok_or_else(|| {
                        RoundcastError::PaletteOverflow {
                            team: team.name.clone(),
                            services: team.services.len(),
                        }
                    })?,
                };
                services.push(ServiceSlot {
                    name: name.clone(),
                    color,
                });
            }
            teams.push(Team {
                name: team.name.clone(),
                services,
            });
        }

        // First occurrence wins if the roster repeats a team name.
        let mut index = HashMap::with_capacity(teams.len());
        for (i, team) in teams.iter().enumerate() {
            index.entry(team.name.clone()).or_insert(i);
        }

        self.teams = teams;
        self.index = index;
        self.established = true;
        Ok(true)
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn team(&self, name: &str) -> Option<&Team> {
        self.team_index(name).map(|i| &self.teams[i])
    }

    pub fn color_of(&self, team: &str, service: &str) -> Option<ServiceColor> {
        self.team(team)?.service(service).map(|s| s.color)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::RosterTeam;

    fn roster(teams: Vec<(&str, Vec<&str>)>) -> RosterFrame {
        RosterFrame {
            round: 1,
            teams: teams
                .into_iter()
                .map(|(name, services)| RosterTeam {
                    name: name.to_string(),
                    services: services.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn colors_follow_service_position() {
        let mut reg = TeamRegistry::new();
        let established = reg
            .bootstrap(&roster(vec![("alpha", vec!["a", "b", "c"])]), PaletteOverflow::Wrap)
            .unwrap();
        assert!(established);
        let colors: Vec<_> = reg.teams()[0].services.iter().map(|s| s.color).collect();
        assert_eq!(
            colors,
            [ServiceColor::Red, ServiceColor::Green, ServiceColor::Blue]
        );
    }

    #[test]
    fn second_roster_is_ignored() {
        let mut reg = TeamRegistry::new();
        reg.bootstrap(&roster(vec![("alpha", vec!["web", "db"])]), PaletteOverflow::Wrap)
            .unwrap();
        let again = reg
            .bootstrap(
                &roster(vec![("gamma", vec!["db", "web"]), ("delta", vec!["x"])]),
                PaletteOverflow::Wrap,
            )
            .unwrap();
        assert!(!again);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.color_of("alpha", "web"), Some(ServiceColor::Red));
        assert_eq!(reg.color_of("alpha", "db"), Some(ServiceColor::Green));
        assert!(reg.team("gamma").is_none());
    }

    #[test]
    fn empty_roster_leaves_registry_open() {
        let mut reg = TeamRegistry::new();
        assert!(!reg.bootstrap(&roster(vec![]), PaletteOverflow::Wrap).unwrap());
        assert!(!reg.is_established());
        assert!(reg.bootstrap(&roster(vec![("a", vec!["web"])]), PaletteOverflow::Wrap).unwrap());
    }

    #[test]
    fn wrap_policy_reuses_palette() {
        let mut reg = TeamRegistry::new();
        let services = vec!["s0", "s1", "s2", "s3", "s4", "s5"];
        reg.bootstrap(&roster(vec![("a", services)]), PaletteOverflow::Wrap)
            .unwrap();
        assert_eq!(reg.color_of("a", "s5"), Some(ServiceColor::Red));
    }

    #[test]
    fn reject_policy_refuses_overflowing_roster() {
        let mut reg = TeamRegistry::new();
        let services = vec!["s0", "s1", "s2", "s3", "s4", "s5"];
        let err = reg
            .bootstrap(&roster(vec![("a", services)]), PaletteOverflow::Reject)
            .unwrap_err();
        assert!(matches!(err, RoundcastError::PaletteOverflow { services: 6, .. }));
        assert!(!reg.is_established());
        assert!(reg.is_empty());
    }

    #[test]
    fn team_index_follows_arrival_order() {
        let mut reg = TeamRegistry::new();
        reg.bootstrap(
            &roster(vec![("beta", vec!["web"]), ("alpha", vec!["web"])]),
            PaletteOverflow::Wrap,
        )
        .unwrap();
        assert_eq!(reg.team_index("beta"), Some(0));
        assert_eq!(reg.team_index("alpha"), Some(1));
        assert_eq!(reg.team_index("omega"), None);
    }
}
