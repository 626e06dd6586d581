use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::cli::utils::{handle_common_command, init_logging, load_config, version_info};
use common::cli::{CommonArgs, CommonCommands};
use common::config::CONFIG;
use nrmetrics::convert_snapshot;
use nrmetrics::snapshot::Snapshot;

#[derive(Parser, Debug)]
#[command(
    name = "nrmetrics",
    version,
    about = "Convert OpenTelemetry aggregation snapshots into New Relic metrics"
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a JSON snapshot and print the resulting metrics
    Convert {
        /// Snapshot file to read
        input: PathBuf,

        #[arg(long, help = "Pretty-print the JSON output")]
        pretty: bool,
    },
    #[command(flatten)]
    Common(CommonCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.common);

    let config = CONFIG.get_or_try_init(|| load_config(cli.common.config.as_ref()))?;

    match cli.command {
        Command::Convert { input, pretty } => {
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read snapshot {}", input.display()))?;
            let snapshot = Snapshot::from_json(&raw)
                .with_context(|| format!("Invalid snapshot {}", input.display()))?;

            let conversion = convert_snapshot(config, &snapshot)
                .with_context(|| format!("Invalid snapshot {}", input.display()))?;

            let output = if pretty {
                serde_json::to_string_pretty(&conversion.metrics)
            } else {
                serde_json::to_string(&conversion.metrics)
            }
            .context("Failed to serialize metrics")?;
            println!("{output}");

            log::info!(
                "Converted {} metrics from {} ({} skipped)",
                conversion.metrics.len(),
                input.display(),
                conversion.skipped
            );
        }
        Command::Common(command) => {
            let version = version_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            handle_common_command(&command, config, &version)?
        }
    }

    Ok(())
}
