use std::future::Future;
use std::time::Duration;

use futures::{Stream, StreamExt};
use roundcast_core::config::FeedConfig;
use roundcast_core::pipeline::{FrameOutcome, Pipeline};
use roundcast_core::presenter::Presenter;

use crate::ticker::Ticker;
use crate::Result;

// ─── DriverOptions ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub tick_period: Duration,
    /// Keep dispatching queued rounds after the frame stream ends.
    pub drain_on_close: bool,
}

impl DriverOptions {
    /// Build options from a config, rejecting error-level config problems.
    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        config.ensure_valid()?;
        Ok(Self {
            tick_period: config.tick_period(),
            drain_on_close: config.drain_on_close,
        })
    }
}

/// Why [`run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The stream ended and undelivered rounds were dropped.
    StreamClosed,
    /// The stream ended and every queued round was delivered.
    Drained,
    /// The shutdown future completed.
    Shutdown,
}

// ─── Event loop ───────────────────────────────────────────────────────────

/// Drive `pipeline` from `frames` until the stream ends or `shutdown`
/// completes.
///
/// Frames and ticks are handled on this one task, never interleaved. The
/// tick timer runs only while the scheduler is draining a round and is
/// cancelled on every exit path. A stream error stops the loop and is
/// returned to the caller.
pub async fn run<P, S, F>(
    pipeline: &mut Pipeline<P>,
    frames: S,
    options: &DriverOptions,
    shutdown: F,
) -> Result<StopReason>
where
    P: Presenter,
    S: Stream<Item = Result<String>> + Unpin,
    F: Future<Output = ()>,
{
    let mut frames = frames;
    let mut ticker = Ticker::new(options.tick_period);
    let mut open = true;
    tokio::pin!(shutdown);

    loop {
        if !open && !pipeline.is_ticking() {
            ticker.cancel();
            return Ok(StopReason::Drained);
        }

        tokio::select! {
            biased;

            _ = &mut shutdown => {
                pipeline.shutdown();
                ticker.cancel();
                tracing::info!("shutdown requested");
                return Ok(StopReason::Shutdown);
            }

            frame = frames.next(), if open => match frame {
                Some(Ok(text)) => {
                    if let FrameOutcome::RoundQueued { round, notifications, transition } =
                        pipeline.handle_text(&text)
                    {
                        tracing::debug!(round, notifications, "round frame");
                        ticker.apply(transition);
                    }
                }
                Some(Err(e)) => {
                    ticker.cancel();
                    return Err(e);
                }
                None => {
                    open = false;
                    if !options.drain_on_close {
                        pipeline.shutdown();
                        ticker.cancel();
                        return Ok(StopReason::StreamClosed);
                    }
                    if pipeline.is_ticking() {
                        tracing::info!(
                            pending = pipeline.scheduler().pending_rounds(),
                            "stream ended, draining queued rounds"
                        );
                    }
                }
            },

            _ = ticker.tick(), if ticker.is_armed() => {
                ticker.apply(pipeline.tick());
            }
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
