use anyhow::{Context, Result};
use roundcast_core::config::FeedConfig;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "roundcast.yaml";

/// Overrides taken from global CLI flags.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub url: Option<String>,
    pub tick_ms: Option<u64>,
    pub batch_size: Option<usize>,
}

/// Resolve the config file to load.
///
/// Priority:
/// 1. `--config` flag / `ROUNDCAST_CONFIG` env var (passed in as `explicit`)
/// 2. `roundcast.yaml` in `cwd`
/// 3. None (built-in defaults)
pub fn resolve_config_path(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    let candidate = cwd.join(DEFAULT_CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}

/// Load the effective config: file (if any), then flag overrides.
pub fn load(explicit: Option<&Path>, overrides: &Overrides) -> Result<FeedConfig> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let path = resolve_config_path(explicit, &cwd);
    let mut config = FeedConfig::load_or_default(path.as_deref())
        .with_context(|| match &path {
            Some(p) => format!("failed to load config from {}", p.display()),
            None => "failed to load config".to_string(),
        })?;
    apply(&mut config, overrides);
    Ok(config)
}

pub fn apply(config: &mut FeedConfig, overrides: &Overrides) {
    if let Some(url) = &overrides.url {
        config.url = url.clone();
    }
    if let Some(tick_ms) = overrides.tick_ms {
        config.tick_ms = tick_ms;
    }
    if let Some(batch_size) = overrides.batch_size {
        config.batch_size = batch_size;
    }
}
