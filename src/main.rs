// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Identifier: file identification worker
//!
//! Pipeline worker that fetches unidentified files from the coordinator and
//! reports magic, ssdeep, TRiD and exiftool results for each of them.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use identifier::config::AppConfig;
use identifier::coordinator::CoordinatorClient;
use identifier::identify::Identifier;
use identifier::tools::SubprocessRunner;
use identifier::worker::Worker;
use identifier::{IdentifierError, Result};

/// Identifier CLI - pipeline file identification worker
#[derive(Parser, Debug)]
#[command(name = "identifier")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version)]
#[command(about = "Identifies pipeline files with magic, ssdeep, TRiD and exiftool", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Poll the coordinator and identify pending files (default)
    Run {
        /// Coordinator base URL (overrides config)
        #[arg(long)]
        coordinator_url: Option<String>,

        /// Seconds between polls (overrides config)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Identify a local file and print the result as JSON
    Identify {
        /// File to identify
        path: PathBuf,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        /// Include the markdown summary
        #[arg(long)]
        markdown: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = dispatch(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    if !cli.quiet {
        info!("Identifier v{}", env!("CARGO_PKG_VERSION"));
    }

    // Load configuration
    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Some(Commands::Run { coordinator_url, interval }) => {
            run_worker(config, coordinator_url, interval).await
        }
        Some(Commands::Identify { path, pretty, markdown }) => {
            run_identify(config, path, pretty, markdown).await
        }
        Some(Commands::Config { action }) => {
            run_config_command(config, action, &cli.config)
        }
        None => run_worker(config, None, None).await,
    }
}

/// Run the poll loop until a coordinator failure stops it
async fn run_worker(
    mut config: AppConfig,
    coordinator_url: Option<String>,
    interval: Option<u64>,
) -> Result<()> {
    // Apply CLI overrides
    if let Some(url) = coordinator_url {
        config.coordinator.url = url;
    }
    if let Some(secs) = interval {
        config.poll.interval_secs = secs;
    }
    config.validate()?;

    info!("Coordinator: {}", config.coordinator.url);
    info!(
        "Tools: file={} ssdeep={} trid={} exiftool={}",
        config.identify.tools.file,
        config.identify.tools.ssdeep,
        config.identify.tools.trid,
        config.identify.tools.exiftool
    );

    let client = CoordinatorClient::new(&config.coordinator)?;
    let identifier = Identifier::new(Arc::new(SubprocessRunner::new()), &config.identify);
    let worker = Worker::new(client, identifier, config);

    worker.run().await
}

/// Identify one local file without talking to the coordinator
async fn run_identify(mut config: AppConfig, path: PathBuf, pretty: bool, markdown: bool) -> Result<()> {
    if !path.is_file() {
        return Err(IdentifierError::Config(format!("{} is not a file", path.display())));
    }
    if markdown {
        config.identify.render_markdown = true;
    }
    config.validate()?;

    let identifier = Identifier::new(Arc::new(SubprocessRunner::new()), &config.identify);
    let result = identifier.identify(&path).await;

    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);

    Ok(())
}

/// Run config commands
fn run_config_command(config: AppConfig, action: ConfigCommands, config_path: &Path) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommands::Init { force } => {
            if config_path.exists() && !force {
                return Err(IdentifierError::Config(format!(
                    "{} already exists. Use --force to overwrite",
                    config_path.display()
                )));
            }
            AppConfig::default().save(config_path)?;
            println!("Default configuration written to {}", config_path.display());
        }
    }

    Ok(())
}
