//! Classification of raw stream frames.
//!
//! Every frame the scoreboard pushes has the shape
//! `{"message": {"round": N, "teams": [...]}}`. The first such frame is the
//! roster; every later one is a round report. Anything else (heartbeats,
//! acknowledgements, garbage) is dropped without comment.

use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Wire shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct WireTeam {
    name: String,
    #[serde(default)]
    services: Vec<WireService>,
}

#[derive(Debug, Deserialize)]
struct WireService {
    name: String,
    #[serde(default)]
    ping_status: Option<i64>,
    #[serde(default)]
    exploits: Option<Vec<Value>>,
}

// ---------------------------------------------------------------------------
// Classified frames
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Roster(RosterFrame),
    Round(RoundFrame),
}

/// Team and service names in arrival order, used once to build the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterFrame {
    pub round: i64,
    pub teams: Vec<RosterTeam>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterTeam {
    pub name: String,
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundFrame {
    pub round: i64,
    pub teams: Vec<RoundTeam>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTeam {
    pub name: String,
    pub services: Vec<ServiceReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReport {
    pub name: String,
    /// Whether the round recorded any exploit attempt against this service.
    pub has_exploits: bool,
    pub ping_status: Option<i64>,
}

impl ServiceReport {
    pub fn is_up(&self) -> bool {
        self.ping_status == Some(1)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Decode a text frame. Invalid JSON yields `None`.
pub fn decode(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

/// Classify a decoded frame given whether the team registry already exists.
///
/// Returns `None` for anything that is not a well-formed round envelope. A
/// `round` of `0` or `null` counts as missing.
pub fn classify(value: &Value, registry_ready: bool) -> Option<Frame> {
    let message = value.get("message")?;
    let round = message.get("round").and_then(Value::as_i64)?;
    if round == 0 {
        return None;
    }
    let teams = Vec::<WireTeam>::deserialize(message.get("teams")?).ok()?;

    if registry_ready {
        Some(Frame::Round(RoundFrame {
            round,
            teams: teams.into_iter().map(round_team).collect(),
        }))
    } else {
        Some(Frame::Roster(RosterFrame {
            round,
            teams: teams.into_iter().map(roster_team).collect(),
        }))
    }
}

/// Decode and classify in one step.
pub fn parse(text: &str, registry_ready: bool) -> Option<Frame> {
    classify(&decode(text)?, registry_ready)
}

fn roster_team(team: WireTeam) -> RosterTeam {
    RosterTeam {
        name: team.name,
        services: team.services.into_iter().map(|s| s.name).collect(),
    }
}

fn round_team(team: WireTeam) -> RoundTeam {
    RoundTeam {
        name: team.name,
        services: team
            .services
            .into_iter()
            .map(|s| ServiceReport {
                has_exploits: s.exploits.is_some_and(|e| !e.is_empty()),
                name: s.name,
                ping_status: s.ping_status,
            })
            .collect(),
    }
}
