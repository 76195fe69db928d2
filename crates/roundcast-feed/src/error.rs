use roundcast_core::RoundcastError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Core(#[from] RoundcastError),

    #[error("Stream error: {0}")]
    Stream(String),
}
