use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Common CLI arguments shared across all binaries
#[derive(Parser, Debug, Clone, Default)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Enable quiet mode (minimal output)")]
    pub quiet: bool,
}

/// Subcommands that only inspect the configuration
#[derive(Subcommand, Debug, Clone)]
pub enum CommonCommands {
    /// Show current configuration and exit
    Config {
        #[arg(long, help = "Show configuration in JSON format")]
        json: bool,
    },
    /// Validate configuration and exit
    Validate,
    /// Show version information and exit
    Version,
}

/// Utility functions for CLI operations
pub mod utils {
    use super::*;
    use crate::config::Configuration;
    use anyhow::{Context, Result};
    use tracing_subscriber::EnvFilter;

    /// Log level selected by `-q`/`-v`; `RUST_LOG` wins when set.
    pub fn log_level(args: &CommonArgs) -> &'static str {
        if args.quiet {
            "warn"
        } else if args.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Initialize logging based on CLI arguments
    pub fn init_logging(args: &CommonArgs) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(log_level(args)));

        // Logs go to stderr, stdout carries command output.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Load configuration with optional override from CLI
    pub fn load_config(config_path: Option<&PathBuf>) -> Result<Configuration> {
        match config_path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Configuration file {} does not exist", path.display());
                }
                log::info!("Loading configuration from: {}", path.display());
                Configuration::load_from_path(path).context("Failed to load configuration")
            }
            None => Configuration::load().context("Failed to load configuration"),
        }
    }

    /// Display configuration in human-readable or JSON format
    pub fn display_config(config: &Configuration, json: bool) -> Result<()> {
        if json {
            let json = serde_json::to_string_pretty(config)
                .context("Failed to serialize configuration to JSON")?;
            println!("{json}");
        } else {
            println!("nrmetrics Configuration:");
            println!("========================");
            if config.exporter.service_name.is_empty() {
                println!("Service name: (none)");
            } else {
                println!("Service name: {}", config.exporter.service_name);
            }
            if config.resource.is_empty() {
                println!("Resource: (empty)");
            } else {
                println!("Resource:");
                for (key, value) in &config.resource {
                    println!("  {key} = {value}");
                }
            }
        }
        Ok(())
    }

    /// Validate configuration and report any issues
    pub fn validate_config(config: &Configuration) -> Result<()> {
        log::info!("Validating configuration...");

        if config.resource.keys().any(|key| key.trim().is_empty()) {
            anyhow::bail!("Resource attribute keys cannot be empty");
        }

        if config.exporter.service_name.trim() != config.exporter.service_name {
            anyhow::bail!("Service name cannot have leading or trailing whitespace");
        }

        log::info!("Configuration validation passed");
        Ok(())
    }

    /// Handle the configuration-only commands. `version` is the line printed
    /// by `version`, see [`version_info`].
    pub fn handle_common_command(
        command: &CommonCommands,
        config: &Configuration,
        version: &str,
    ) -> Result<()> {
        match command {
            CommonCommands::Config { json } => display_config(config, *json),
            CommonCommands::Validate => validate_config(config),
            CommonCommands::Version => {
                println!("{version}");
                Ok(())
            }
        }
    }

    /// Standard version information for the binary `name` at `version`
    pub fn version_info(name: &str, version: &str) -> String {
        format!("{name} {version} ({})", env!("CARGO_PKG_RUST_VERSION"))
    }
}
