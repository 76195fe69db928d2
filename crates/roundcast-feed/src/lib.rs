//! `roundcast-feed`: async transport and event loop for roundcast.
//!
//! # Architecture
//!
//! ```text
//! FrameStream     ← websocket (tokio-tungstenite) or JSON lines
//!     │              background task + mpsc channel
//!     ▼
//! driver::run     ← single select! loop: frames, ticks, shutdown
//!     │
//!     ▼
//! Pipeline        ← roundcast-core: registry, extraction, scheduler
//!     │
//!     ▼
//! Presenter
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use roundcast_core::{config::FeedConfig, pipeline::Pipeline, presenter::LogPresenter};
//! use roundcast_feed::{driver, FrameStream};
//!
//! let config = FeedConfig::default();
//! let options = driver::DriverOptions::from_config(&config)?;
//! let mut pipeline = Pipeline::new(LogPresenter, &config);
//! let frames = FrameStream::websocket(&config.url);
//! driver::run(&mut pipeline, frames, &options, tokio::signal::ctrl_c().map(|_| ())).await?;
//! ```

pub mod driver;
pub mod error;
pub mod stream;
pub mod ticker;

pub use driver::{run, DriverOptions, StopReason};
pub use error::FeedError;
pub use stream::FrameStream;
pub use ticker::Ticker;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, FeedError>;
