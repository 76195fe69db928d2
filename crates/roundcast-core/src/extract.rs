use crate::frame::RoundFrame;
use crate::registry::TeamRegistry;
use crate::types::{Notification, Round};

/// Result of turning one round frame into a [`Round`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub round: Round,
    /// Notifications discarded because their team or service is not in the
    /// registry.
    pub dropped: usize,
}

/// Build the round's notifications: every service with exploit activity,
/// in frame order, restricted to teams and services the registry knows.
pub fn extract(frame: &RoundFrame, registry: &TeamRegistry) -> Extraction {
    let mut notifications = Vec::new();
    let mut dropped = 0;

    for team in &frame.teams {
        let known = registry.team(&team.name);
        for service in team.services.iter().filter(|s| s.has_exploits) {
            match known {
                Some(t) if t.service(&service.name).is_some() => {
                    notifications.push(Notification::new(
                        &team.name,
                        &service.name,
                        service.is_up(),
                    ));
                }
                _ => dropped += 1,
            }
        }
    }

    Extraction {
        round: Round {
            id: frame.round,
            notifications,
        },
        dropped,
    }
}
