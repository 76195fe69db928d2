mod cmd;
mod output;
mod presenter;
mod settings;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use settings::Overrides;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "roundcast",
    about = "Paced service-status notifications from a live attack/defence scoreboard",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: ./roundcast.yaml if present)
    #[arg(long, global = true, env = "ROUNDCAST_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Milliseconds between notification batches
    #[arg(long, global = true)]
    tick_ms: Option<u64>,

    /// Notifications dispatched per tick
    #[arg(long, global = true)]
    batch_size: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the scoreboard websocket and present notifications live
    Watch {
        /// Scoreboard websocket URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Feed recorded frames (one JSON document per line) through the pipeline
    Replay {
        /// Capture file, or `-` for stdin
        input: PathBuf,
    },

    /// Inspect and validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Watch { .. } | Commands::Replay { .. } => tracing::Level::INFO,
        Commands::Config { .. } => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut overrides = Overrides {
        url: None,
        tick_ms: cli.tick_ms,
        batch_size: cli.batch_size,
    };

    let result = match cli.command {
        Commands::Watch { url } => {
            overrides.url = url;
            settings::load(cli.config.as_deref(), &overrides)
                .and_then(|config| cmd::watch::run(&config, cli.json))
        }
        Commands::Replay { input } => settings::load(cli.config.as_deref(), &overrides)
            .and_then(|config| cmd::replay::run(&config, &input, cli.json)),
        Commands::Config { subcommand } => settings::load(cli.config.as_deref(), &overrides)
            .and_then(|config| cmd::config::run(&config, subcommand, cli.json)),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
