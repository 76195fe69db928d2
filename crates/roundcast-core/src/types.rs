use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ServiceColor
// ---------------------------------------------------------------------------

/// Display palette for services. Assignment is positional: the first service
/// of every team is red, the second green, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceColor {
    Red,
    Green,
    Blue,
    Purple,
    Yellow,
}

impl ServiceColor {
    pub fn all() -> &'static [ServiceColor] {
        &[
            ServiceColor::Red,
            ServiceColor::Green,
            ServiceColor::Blue,
            ServiceColor::Purple,
            ServiceColor::Yellow,
        ]
    }

    /// Palette entry for a service position, or `None` past the last entry.
    pub fn at(position: usize) -> Option<ServiceColor> {
        Self::all().get(position).copied()
    }

    /// Palette entry for a service position, wrapping past the last entry.
    pub fn wrapping(position: usize) -> ServiceColor {
        let all = Self::all();
        all[position % all.len()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceColor::Red => "red",
            ServiceColor::Green => "green",
            ServiceColor::Blue => "blue",
            ServiceColor::Purple => "purple",
            ServiceColor::Yellow => "yellow",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            ServiceColor::Red => "#F37171",
            ServiceColor::Green => "#AAF371",
            ServiceColor::Blue => "#71ADF3",
            ServiceColor::Purple => "#BA71F3",
            ServiceColor::Yellow => "#F3CF71",
        }
    }
}

impl fmt::Display for ServiceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const STATUS_UP_HEX: &str = "#51A544";
pub const STATUS_DOWN_HEX: &str = "#DF4949";

// ---------------------------------------------------------------------------
// Team / ServiceSlot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSlot {
    pub name: String,
    pub color: ServiceColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub services: Vec<ServiceSlot>,
}

impl Team {
    pub fn service(&self, name: &str) -> Option<&ServiceSlot> {
        self.services.iter().find(|s| s.name == name)
    }
}

// ---------------------------------------------------------------------------
// Notification / Round
// ---------------------------------------------------------------------------

/// A single (team, service, pass/fail) fact pending display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub team: String,
    pub service: String,
    /// `true` when the service check passed this round.
    pub status: bool,
}

impl Notification {
    pub fn new(team: impl Into<String>, service: impl Into<String>, status: bool) -> Self {
        Self {
            team: team.into(),
            service: service.into(),
            status,
        }
    }

    pub fn status_color(&self) -> &'static str {
        if self.status {
            STATUS_UP_HEX
        } else {
            STATUS_DOWN_HEX
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub id: i64,
    pub notifications: Vec<Notification>,
}

impl Round {
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_order_is_fixed() {
        let names: Vec<_> = ServiceColor::all().iter().map(|c| c.as_str()).collect();
        assert_eq!(names, ["red", "green", "blue", "purple", "yellow"]);
        assert_eq!(ServiceColor::Blue.hex(), "#71ADF3");
    }

    #[test]
    fn at_stops_at_palette_end() {
        assert_eq!(ServiceColor::at(4), Some(ServiceColor::Yellow));
        assert_eq!(ServiceColor::at(5), None);
    }

    #[test]
    fn wrapping_restarts_palette() {
        assert_eq!(ServiceColor::wrapping(5), ServiceColor::Red);
        assert_eq!(ServiceColor::wrapping(7), ServiceColor::Blue);
    }

    #[test]
    fn status_color_tracks_status() {
        assert_eq!(Notification::new("a", "web", true).status_color(), STATUS_UP_HEX);
        assert_eq!(Notification::new("a", "web", false).status_color(), STATUS_DOWN_HEX);
    }

    #[test]
    fn color_serializes_snake_case() {
        let json = serde_json::to_string(&ServiceColor::Yellow).unwrap();
        assert_eq!(json, "\"yellow\"");
    }
}
