//! Frame-to-presenter pipeline.
//!
//! [`Pipeline`] ties the parser, registry, extractor and scheduler together
//! behind two entry points: one per inbound frame and one per timer tick.
//! Both must be called from the same task; the pipeline holds no locks.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::config::FeedConfig;
use crate::extract::extract;
use crate::frame::{self, Frame};
use crate::presenter::Presenter;
use crate::registry::{PaletteOverflow, TeamRegistry};
use crate::scheduler::{NotificationScheduler, SchedulerState, Transition};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the roster frame.
    Loading,
    Ready,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Loading => "loading",
            Phase::Ready => "ready",
        })
    }
}

// ---------------------------------------------------------------------------
// FrameOutcome / PipelineStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not a round envelope, or not valid JSON.
    Ignored,
    RosterEstablished { teams: usize },
    /// Roster frame with no teams; the registry stays open.
    RosterIgnored,
    /// Roster refused by the palette overflow policy.
    RosterRejected,
    RoundQueued {
        round: i64,
        notifications: usize,
        transition: Option<Transition>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub frames_received: u64,
    pub frames_ignored: u64,
    pub rosters_ignored: u64,
    pub rosters_rejected: u64,
    pub rounds_enqueued: u64,
    pub rounds_discarded: u64,
    pub notifications_extracted: u64,
    pub notifications_dropped: u64,
    pub notifications_dispatched: u64,
    pub ticks: u64,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

pub struct Pipeline<P> {
    registry: TeamRegistry,
    scheduler: NotificationScheduler,
    presenter: P,
    overflow: PaletteOverflow,
    stats: PipelineStats,
}

impl<P: Presenter> Pipeline<P> {
    pub fn new(presenter: P, config: &FeedConfig) -> Self {
        Self {
            registry: TeamRegistry::new(),
            scheduler: NotificationScheduler::new(config.batch_size),
            presenter,
            overflow: config.palette_overflow,
            stats: PipelineStats::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.registry.is_established() {
            Phase::Ready
        } else {
            Phase::Loading
        }
    }

    pub fn registry(&self) -> &TeamRegistry {
        &self.registry
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn is_ticking(&self) -> bool {
        self.scheduler.is_ticking()
    }

    pub fn scheduler(&self) -> &NotificationScheduler {
        &self.scheduler
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            rounds_discarded: self.scheduler.discarded_rounds(),
            ..self.stats.clone()
        }
    }

    /// Handle one text frame from the stream.
    pub fn handle_text(&mut self, text: &str) -> FrameOutcome {
        match frame::decode(text) {
            Some(value) => self.handle_frame(&value),
            None => {
                self.stats.frames_received += 1;
                self.stats.frames_ignored += 1;
                FrameOutcome::Ignored
            }
        }
    }

    /// Handle one decoded frame.
    pub fn handle_frame(&mut self, value: &Value) -> FrameOutcome {
        self.stats.frames_received += 1;
        match frame::classify(value, self.registry.is_established()) {
            None => {
                self.stats.frames_ignored += 1;
                FrameOutcome::Ignored
            }
            Some(Frame::Roster(roster)) => match self.registry.bootstrap(&roster, self.overflow) {
                Ok(true) => {
                    tracing::info!(
                        round = roster.round,
                        teams = self.registry.len(),
                        "roster established"
                    );
                    self.presenter.on_roster_ready(self.registry.teams());
                    FrameOutcome::RosterEstablished {
                        teams: self.registry.len(),
                    }
                }
                Ok(false) => {
                    self.stats.rosters_ignored += 1;
                    FrameOutcome::RosterIgnored
                }
                Err(e) => {
                    self.stats.rosters_rejected += 1;
                    tracing::warn!(round = roster.round, "roster rejected: {e}");
                    FrameOutcome::RosterRejected
                }
            },
            Some(Frame::Round(round_frame)) => {
                let extraction = extract(&round_frame, &self.registry);
                let round = extraction.round;
                let id = round.id;
                let notifications = round.notifications.len();

                self.stats.rounds_enqueued += 1;
                self.stats.notifications_extracted += notifications as u64;
                self.stats.notifications_dropped += extraction.dropped as u64;

                let transition = self.scheduler.enqueue(round);
                FrameOutcome::RoundQueued {
                    round: id,
                    notifications,
                    transition,
                }
            }
        }
    }

    /// Handle one timer tick, forwarding dispatched notifications to the
    /// presenter.
    pub fn tick(&mut self) -> Option<Transition> {
        self.stats.ticks += 1;
        let tick = self.scheduler.tick();
        for n in &tick.dispatched {
            // Extraction only lets known teams through.
            let Some(team_index) = self.registry.team_index(&n.team) else {
                continue;
            };
            self.presenter.on_notification(team_index, n);
            self.stats.notifications_dispatched += 1;
        }
        tick.transition
    }

    /// Drop queued and in-flight rounds.
    pub fn shutdown(&mut self) -> Option<Transition> {
        self.scheduler.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::{PresenterEvent, RecordingPresenter};
    use crate::types::{Notification, ServiceColor};
    use serde_json::json;

    fn pipeline() -> Pipeline<RecordingPresenter> {
        Pipeline::new(RecordingPresenter::new(), &FeedConfig::default())
    }

    fn roster_frame() -> Value {
        json!({"message": {"round": 1, "teams": [
            {"name": "alpha", "services": [{"name": "web", "ping_status": 1, "exploits": null}]},
            {"name": "beta", "services": [{"name": "web", "ping_status": 1, "exploits": null}]}
        ]}})
    }

    fn round_frame(round: i64, teams: Value) -> Value {
        json!({"message": {"round": round, "teams": teams}})
    }

    #[test]
    fn scoreboard_scenario() {
        let mut p = pipeline();
        assert_eq!(p.phase(), Phase::Loading);
        assert_eq!(
            p.handle_frame(&roster_frame()),
            FrameOutcome::RosterEstablished { teams: 2 }
        );
        assert_eq!(p.phase(), Phase::Ready);

        let outcome = p.handle_frame(&round_frame(
            2,
            json!([
                {"name": "alpha", "services": [{"name": "web", "ping_status": 1, "exploits": [{"status": 1}]}]},
                {"name": "beta", "services": [{"name": "web", "ping_status": -1, "exploits": null}]}
            ]),
        ));
        assert_eq!(
            outcome,
            FrameOutcome::RoundQueued {
                round: 2,
                notifications: 1,
                transition: Some(Transition::Draining { round: 2 }),
            }
        );

        assert_eq!(p.tick(), None);
        assert_eq!(
            p.presenter().notifications(),
            [&Notification::new("alpha", "web", true)]
        );
        assert_eq!(p.tick(), Some(Transition::Idle));
        assert_eq!(p.scheduler_state(), SchedulerState::Idle);
    }

    #[test]
    fn roster_reaches_presenter_once() {
        let mut p = pipeline();
        p.handle_frame(&roster_frame());
        p.handle_frame(&roster_frame());
        assert_eq!(p.presenter().rosters(), 1);
        let PresenterEvent::Roster { teams } = &p.presenter().events[0] else {
            panic!("expected roster event")
        };
        assert_eq!(teams[1].name, "beta");
        assert_eq!(teams[1].services[0].color, ServiceColor::Red);
    }

    #[test]
    fn later_roster_does_not_change_registry() {
        let mut p = pipeline();
        p.handle_frame(&roster_frame());
        p.handle_frame(&round_frame(
            2,
            json!([{"name": "gamma", "services": [{"name": "db"}, {"name": "web"}]}]),
        ));
        assert_eq!(p.registry().len(), 2);
        assert!(p.registry().team("gamma").is_none());
    }

    #[test]
    fn frames_before_roster_with_bad_shape_are_ignored() {
        let mut p = pipeline();
        assert_eq!(p.handle_text("not json"), FrameOutcome::Ignored);
        assert_eq!(p.handle_text(r#"{"message":"hello"}"#), FrameOutcome::Ignored);
        assert_eq!(
            p.handle_text(r#"{"message":{"round":1,"teams":[]}}"#),
            FrameOutcome::RosterIgnored
        );
        assert_eq!(p.phase(), Phase::Loading);
        let stats = p.stats();
        assert_eq!(stats.frames_received, 3);
        assert_eq!(stats.frames_ignored, 2);
        assert_eq!(stats.rosters_ignored, 1);
    }

    #[test]
    fn unknown_team_does_not_reach_presenter() {
        let mut p = pipeline();
        p.handle_frame(&roster_frame());
        let outcome = p.handle_frame(&round_frame(
            2,
            json!([{"name": "omega", "services": [{"name": "web", "ping_status": 1, "exploits": [{}]}]}]),
        ));
        assert_eq!(
            outcome,
            FrameOutcome::RoundQueued {
                round: 2,
                notifications: 0,
                transition: None,
            }
        );
        assert_eq!(p.tick(), None);
        assert!(p.presenter().notifications().is_empty());
        let stats = p.stats();
        assert_eq!(stats.notifications_dropped, 1);
        assert_eq!(stats.rounds_discarded, 1);
    }

    #[test]
    fn reject_policy_keeps_pipeline_loading() {
        let cfg = FeedConfig {
            palette_overflow: PaletteOverflow::Reject,
            ..FeedConfig::default()
        };
        let mut p = Pipeline::new(RecordingPresenter::new(), &cfg);
        let services: Vec<_> = (0..6).map(|i| json!({"name": format!("s{i}")})).collect();
        let big = json!({"message": {"round": 1, "teams": [{"name": "a", "services": services}]}});
        assert_eq!(p.handle_frame(&big), FrameOutcome::RosterRejected);
        assert_eq!(p.phase(), Phase::Loading);
        assert_eq!(p.stats().rosters_rejected, 1);
        assert_eq!(p.stats().rosters_ignored, 0);
        assert_eq!(
            p.handle_frame(&roster_frame()),
            FrameOutcome::RosterEstablished { teams: 2 }
        );
    }

    #[test]
    fn dispatch_carries_roster_index() {
        let mut p = pipeline();
        p.handle_frame(&roster_frame());
        p.handle_frame(&round_frame(
            2,
            json!([{"name": "beta", "services": [{"name": "web", "ping_status": -1, "exploits": [{}]}]}]),
        ));
        p.tick();
        let last = p.presenter().events.last().cloned();
        assert_eq!(
            last,
            Some(PresenterEvent::Notification {
                team_index: 1,
                notification: Notification::new("beta", "web", false),
            })
        );
        assert_eq!(p.stats().notifications_dispatched, 1);
    }

    #[test]
    fn shutdown_stops_ticking() {
        let mut p = pipeline();
        p.handle_frame(&roster_frame());
        p.handle_frame(&round_frame(
            2,
            json!([{"name": "alpha", "services": [{"name": "web", "ping_status": 1, "exploits": [{}]}]}]),
        ));
        assert!(p.is_ticking());
        assert_eq!(p.shutdown(), Some(Transition::Idle));
        assert!(!p.is_ticking());
    }
}
