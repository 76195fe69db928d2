use chrono::Utc;
use roundcast_core::presenter::Presenter;
use roundcast_core::types::{Notification, Team};
use serde_json::{json, Value};
use std::io::Write;

/// Writes one JSON document per event to `out`.
pub struct JsonLinesPresenter<W: Write> {
    out: W,
    teams: Vec<Team>,
}

impl<W: Write> JsonLinesPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            teams: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn write_event(&mut self, value: &Value) {
        let written = serde_json::to_writer(&mut self.out, value)
            .map_err(std::io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"))
            .and_then(|_| self.out.flush());
        if let Err(e) = written {
            tracing::warn!(error = %e, "failed to write event");
        }
    }
}

impl<W: Write> Presenter for JsonLinesPresenter<W> {
    fn on_roster_ready(&mut self, teams: &[Team]) {
        self.teams = teams.to_vec();
        let teams: Vec<Value> = teams
            .iter()
            .enumerate()
            .map(|(index, team)| {
                let services: Vec<Value> = team
                    .services
                    .iter()
                    .map(|s| json!({"name": s.name, "color": s.color, "hex": s.color.hex()}))
                    .collect();
                json!({"index": index, "name": team.name, "services": services})
            })
            .collect();
        self.write_event(&json!({
            "event": "roster",
            "at": Utc::now().to_rfc3339(),
            "teams": teams,
        }));
    }

    fn on_notification(&mut self, team_index: usize, n: &Notification) {
        let color = self
            .teams
            .get(team_index)
            .and_then(|t| t.service(&n.service))
            .map(|s| s.color);
        self.write_event(&json!({
            "event": "notification",
            "at": Utc::now().to_rfc3339(),
            "team_index": team_index,
            "team": n.team,
            "service": n.service,
            "color": color,
            "status": if n.status { "up" } else { "down" },
            "status_color": n.status_color(),
        }));
    }
}
