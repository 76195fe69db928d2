pub mod config;
pub mod error;
pub mod extract;
pub mod frame;
pub mod pipeline;
pub mod presenter;
pub mod queue;
pub mod registry;
pub mod scheduler;
pub mod types;

pub use error::{Result, RoundcastError};
