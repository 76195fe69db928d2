use anyhow::Result;
use roundcast_core::config::FeedConfig;
use roundcast_feed::FrameStream;

pub fn run(config: &FeedConfig, json: bool) -> Result<()> {
    tracing::info!(url = %config.url, "connecting to scoreboard");
    let url = config.url.clone();
    super::drive(config, json, move || Ok(FrameStream::websocket(url)))
}
