use anyhow::{Context, Result};
use roundcast_core::config::FeedConfig;
use roundcast_feed::FrameStream;
use std::path::Path;

pub fn run(config: &FeedConfig, input: &Path, json: bool) -> Result<()> {
    if input == Path::new("-") {
        return super::drive(config, json, || {
            Ok(FrameStream::lines(tokio::io::stdin()))
        });
    }

    let file = std::fs::File::open(input)
        .with_context(|| format!("cannot open capture {}", input.display()))?;
    tracing::info!(path = %input.display(), "replaying capture");
    super::drive(config, json, move || {
        Ok(FrameStream::lines(tokio::fs::File::from_std(file)))
    })
}
