//! Round-at-a-time notification scheduler.
//!
//! ```text
//!            enqueue (idle)            tick: batch dispatched
//!   Idle ─────────────────────▶ Draining ◀──────┐
//!    ▲                              │  └────────┘
//!    │   tick: nothing left,        │
//!    └──── queue empty ─────────────┘
//!          (queue not empty: next round starts immediately)
//! ```
//!
//! The scheduler owns no timer. It reports [`Transition`]s and the caller
//! starts or cancels its tick timer accordingly, then feeds ticks back in
//! through [`NotificationScheduler::tick`].

use serde::Serialize;
use std::fmt;

use crate::queue::RoundQueue;
use crate::types::{Notification, Round};

pub const DEFAULT_BATCH_SIZE: usize = 4;

// ---------------------------------------------------------------------------
// SchedulerState / Transition / Tick
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    Idle,
    Draining,
}

impl SchedulerState {
    pub fn as_str(self) -> &'static str {
        match self {
            SchedulerState::Idle => "idle",
            SchedulerState::Draining => "draining",
        }
    }
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timer instruction produced by a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A new round became active: (re)start the tick timer.
    Draining { round: i64 },
    /// Nothing left to dispatch: cancel the tick timer.
    Idle,
}

/// Outcome of one timer firing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tick {
    pub dispatched: Vec<Notification>,
    pub transition: Option<Transition>,
}

// ---------------------------------------------------------------------------
// Backlog
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct TeamBacklog {
    team: String,
    pending: Vec<Notification>,
}

#[derive(Debug)]
struct ActiveRound {
    id: i64,
    /// Per-team groups in first-appearance order. A group is removed as soon
    /// as its last notification is dispatched, so none is ever empty.
    backlog: Vec<TeamBacklog>,
}

impl ActiveRound {
    fn from_round(round: Round) -> Self {
        let mut backlog: Vec<TeamBacklog> = Vec::new();
        for n in round.notifications {
            match backlog.iter_mut().find(|g| g.team == n.team) {
                Some(group) => group.pending.push(n),
                None => backlog.push(TeamBacklog {
                    team: n.team.clone(),
                    pending: vec![n],
                }),
            }
        }
        Self {
            id: round.id,
            backlog,
        }
    }

    fn remaining(&self) -> usize {
        self.backlog.iter().map(|g| g.pending.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// NotificationScheduler
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct NotificationScheduler {
    pending: RoundQueue,
    active: Option<ActiveRound>,
    batch_size: usize,
    discarded_rounds: u64,
}

impl Default for NotificationScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl NotificationScheduler {
    /// `batch_size` is clamped to at least one team per tick.
    pub fn new(batch_size: usize) -> Self {
        Self {
            pending: RoundQueue::new(),
            active: None,
            batch_size: batch_size.max(1),
            discarded_rounds: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.active.is_some() {
            SchedulerState::Draining
        } else {
            SchedulerState::Idle
        }
    }

    /// Whether the caller's tick timer should currently be running.
    pub fn is_ticking(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_round(&self) -> Option<i64> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn pending_rounds(&self) -> usize {
        self.pending.len()
    }

    /// Notifications of the active round not dispatched yet.
    pub fn backlog_len(&self) -> usize {
        self.active.as_ref().map_or(0, ActiveRound::remaining)
    }

    /// Rounds thrown away because they carried no notifications.
    pub fn discarded_rounds(&self) -> u64 {
        self.discarded_rounds
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Queue a round. Starts draining right away when idle.
    pub fn enqueue(&mut self, round: Round) -> Option<Transition> {
        tracing::debug!(
            round = round.id,
            notifications = round.notifications.len(),
            "round enqueued"
        );
        self.pending.enqueue(round);
        if self.active.is_some() {
            return None;
        }
        self.start_next()
    }

    /// Handle one timer firing.
    ///
    /// Pops the tail notification of each of the first `batch_size` team
    /// groups. A tick that finds nothing to dispatch ends the round; the next
    /// queued round, if any, becomes active in the same call.
    pub fn tick(&mut self) -> Tick {
        let Some(active) = self.active.as_mut() else {
            return Tick::default();
        };

        let mut dispatched = Vec::with_capacity(self.batch_size);
        for group in active.backlog.iter_mut().take(self.batch_size) {
            if let Some(n) = group.pending.pop() {
                dispatched.push(n);
            }
        }
        active.backlog.retain(|g| !g.pending.is_empty());

        if !dispatched.is_empty() {
            return Tick {
                dispatched,
                transition: None,
            };
        }

        tracing::debug!(round = active.id, "round drained");
        self.active = None;
        let transition = self.start_next().unwrap_or(Transition::Idle);
        if transition == Transition::Idle {
            tracing::debug!("scheduler idle");
        }
        Tick {
            dispatched,
            transition: Some(transition),
        }
    }

    /// Drop whatever is queued or in flight. Used on shutdown.
    pub fn clear(&mut self) -> Option<Transition> {
        while self.pending.dequeue_next().is_some() {}
        self.active.take().map(|_| Transition::Idle)
    }

    fn start_next(&mut self) -> Option<Transition> {
        while let Some(round) = self.pending.dequeue_next() {
            if round.is_empty() {
                self.discarded_rounds += 1;
                tracing::debug!(round = round.id, "empty round discarded");
                continue;
            }
            let id = round.id;
            let active = ActiveRound::from_round(round);
            tracing::debug!(round = id, teams = active.backlog.len(), "draining round");
            self.active = Some(active);
            return Some(Transition::Draining { round: id });
        }
        None
    }
}
