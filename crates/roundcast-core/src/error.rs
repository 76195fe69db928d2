use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoundcastError {
    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("team '{team}' declares {services} services but the palette only has 5 colors")]
    PaletteOverflow { team: String, services: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RoundcastError>;
