use crate::error::{Result, RoundcastError};
use crate::registry::PaletteOverflow;
use crate::scheduler::DEFAULT_BATCH_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// FeedConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub palette_overflow: PaletteOverflow,
    #[serde(default = "default_drain_on_close")]
    pub drain_on_close: bool,
}

fn default_url() -> String {
    "ws://defence.explabs.ru/ws".to_string()
}

fn default_tick_ms() -> u64 {
    2500
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_drain_on_close() -> bool {
    true
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            tick_ms: default_tick_ms(),
            batch_size: default_batch_size(),
            palette_overflow: PaletteOverflow::default(),
            drain_on_close: default_drain_on_close(),
        }
    }
}

impl FeedConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RoundcastError::ConfigNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        // An empty file means "all defaults".
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: FeedConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Load `path` if given, otherwise start from defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.tick_ms == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "tick_ms must be greater than 0".to_string(),
            });
        } else if self.tick_ms < 250 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "tick_ms of {} is too short for notifications to be readable",
                    self.tick_ms
                ),
            });
        }

        if self.batch_size == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "batch_size must be greater than 0".to_string(),
            });
        }

        if !(self.url.starts_with("ws://") || self.url.starts_with("wss://")) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("url '{}' is not a ws:// or wss:// endpoint", self.url),
            });
        }

        warnings
    }

    /// Fail on the first error-level warning.
    pub fn ensure_valid(&self) -> Result<()> {
        match self
            .validate()
            .into_iter()
            .find(|w| w.level == WarnLevel::Error)
        {
            Some(w) => Err(RoundcastError::InvalidConfig(w.message)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_scoreboard_pacing() {
        let cfg = FeedConfig::default();
        assert_eq!(cfg.tick_period(), Duration::from_millis(2500));
        assert_eq!(cfg.batch_size, 4);
        assert_eq!(cfg.palette_overflow, PaletteOverflow::Wrap);
        assert!(cfg.drain_on_close);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let cfg: FeedConfig =
            serde_yaml::from_str("tick_ms: 1000\npalette_overflow: reject\n").unwrap();
        assert_eq!(cfg.tick_ms, 1000);
        assert_eq!(cfg.batch_size, 4);
        assert_eq!(cfg.palette_overflow, PaletteOverflow::Reject);
        assert_eq!(cfg.url, "ws://defence.explabs.ru/ws");
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("roundcast.yaml");
        std::fs::write(&path, "batch_size: 2\ndrain_on_close: false\n").unwrap();
        let cfg = FeedConfig::load(&path).unwrap();
        assert_eq!(cfg.batch_size, 2);
        assert!(!cfg.drain_on_close);
    }

    #[test]
    fn load_empty_file_is_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("roundcast.yaml");
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(FeedConfig::load(&path).unwrap(), FeedConfig::default());
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = FeedConfig::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, RoundcastError::ConfigNotFound(_)));
    }

    #[test]
    fn zero_values_are_errors() {
        let cfg = FeedConfig {
            tick_ms: 0,
            batch_size: 0,
            ..FeedConfig::default()
        };
        let errors = cfg
            .validate()
            .into_iter()
            .filter(|w| w.level == WarnLevel::Error)
            .count();
        assert_eq!(errors, 2);
        assert!(cfg.ensure_valid().is_err());
    }

    #[test]
    fn non_websocket_url_warns() {
        let cfg = FeedConfig {
            url: "http://example.com".to_string(),
            ..FeedConfig::default()
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
        assert!(cfg.ensure_valid().is_ok());
    }
}
