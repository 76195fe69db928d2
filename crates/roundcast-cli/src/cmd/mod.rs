pub mod config;
pub mod replay;
pub mod watch;

use crate::output::{print_table, stats_rows};
use crate::presenter::JsonLinesPresenter;
use anyhow::{Context, Result};
use roundcast_core::config::FeedConfig;
use roundcast_core::pipeline::Pipeline;
use roundcast_core::presenter::{LogPresenter, Presenter};
use roundcast_feed::{DriverOptions, FrameStream, StopReason};
use serde_json::json;

fn stop_label(reason: StopReason) -> &'static str {
    match reason {
        StopReason::StreamClosed => "stream_closed",
        StopReason::Drained => "drained",
        StopReason::Shutdown => "shutdown",
    }
}

/// Run `frames` through a fresh pipeline until the stream ends or Ctrl-C,
/// then print a summary.
///
/// `frames` is called inside the runtime so sources can spawn their reader
/// tasks.
pub(crate) fn drive<F>(config: &FeedConfig, json: bool, frames: F) -> Result<()>
where
    F: FnOnce() -> Result<FrameStream>,
{
    let options = DriverOptions::from_config(config).context("invalid config")?;
    let presenter: Box<dyn Presenter> = if json {
        Box::new(JsonLinesPresenter::new(std::io::stdout()))
    } else {
        Box::new(LogPresenter)
    };
    let mut pipeline = Pipeline::new(presenter, config);

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(async {
        let frames = frames()?;
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        roundcast_feed::run(&mut pipeline, frames, &options, shutdown)
            .await
            .context("scoreboard stream failed")
    });

    let stats = pipeline.stats();
    let reason = match &outcome {
        Ok(reason) => stop_label(*reason),
        Err(_) => "error",
    };

    if json {
        let summary = json!({
            "event": "summary",
            "stop": reason,
            "stats": stats,
        });
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        tracing::info!(stop = reason, phase = %pipeline.phase(), "finished");
        print_table(&["COUNTER", "VALUE"], stats_rows(&stats));
    }

    outcome.map(|_| ())
}
