use serde::Serialize;

use crate::types::{Notification, Team};

/// Display sink for the pipeline. Calls are fire-and-forget: nothing a
/// presenter does flows back into scheduling.
pub trait Presenter {
    /// Called once, when the team registry is established.
    fn on_roster_ready(&mut self, teams: &[Team]);

    /// Called for every dispatched notification. `team_index` is the team's
    /// position in the roster passed to [`Presenter::on_roster_ready`].
    fn on_notification(&mut self, team_index: usize, notification: &Notification);
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn on_roster_ready(&mut self, teams: &[Team]) {
        (**self).on_roster_ready(teams)
    }

    fn on_notification(&mut self, team_index: usize, notification: &Notification) {
        (**self).on_notification(team_index, notification)
    }
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn on_roster_ready(&mut self, teams: &[Team]) {
        (**self).on_roster_ready(teams)
    }

    fn on_notification(&mut self, team_index: usize, notification: &Notification) {
        (**self).on_notification(team_index, notification)
    }
}

// ---------------------------------------------------------------------------
// LogPresenter
// ---------------------------------------------------------------------------

/// Writes every event to the tracing log at INFO.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn on_roster_ready(&mut self, teams: &[Team]) {
        for team in teams {
            let services: Vec<String> = team
                .services
                .iter()
                .map(|s| format!("{}({})", s.name, s.color))
                .collect();
            tracing::info!(team = %team.name, services = %services.join(", "), "roster");
        }
    }

    fn on_notification(&mut self, team_index: usize, n: &Notification) {
        let status = if n.status { "up" } else { "down" };
        tracing::info!(
            team = %n.team,
            team_index,
            service = %n.service,
            status,
            "service status"
        );
    }
}

// ---------------------------------------------------------------------------
// RecordingPresenter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PresenterEvent {
    Roster {
        teams: Vec<Team>,
    },
    Notification {
        team_index: usize,
        notification: Notification,
    },
}

/// Keeps every event in memory, in call order.
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    pub events: Vec<PresenterEvent>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<&Notification> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Notification { notification, .. } => Some(notification),
                PresenterEvent::Roster { .. } => None,
            })
            .collect()
    }

    pub fn rosters(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PresenterEvent::Roster { .. }))
            .count()
    }
}

impl Presenter for RecordingPresenter {
    fn on_roster_ready(&mut self, teams: &[Team]) {
        self.events.push(PresenterEvent::Roster {
            teams: teams.to_vec(),
        });
    }

    fn on_notification(&mut self, team_index: usize, notification: &Notification) {
        self.events.push(PresenterEvent::Notification {
            team_index,
            notification: notification.clone(),
        });
    }
}
