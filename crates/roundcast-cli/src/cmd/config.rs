use crate::output::{print_json, print_table};
use clap::Subcommand;
use roundcast_core::config::{FeedConfig, WarnLevel};

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration after flags are applied
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(config: &FeedConfig, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(config, json),
        ConfigSubcommand::Validate => validate(config, json),
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(config: &FeedConfig, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(config);
    }
    print_table(
        &["KEY", "VALUE"],
        vec![
            vec!["url".into(), config.url.clone()],
            vec!["tick_ms".into(), config.tick_ms.to_string()],
            vec!["batch_size".into(), config.batch_size.to_string()],
            vec![
                "palette_overflow".into(),
                config.palette_overflow.as_str().to_string(),
            ],
            vec!["drain_on_close".into(), config.drain_on_close.to_string()],
        ],
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(config: &FeedConfig, json: bool) -> anyhow::Result<()> {
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("config validation found errors");
    }

    Ok(())
}
