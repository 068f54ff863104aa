mod present;

use std::{
    fs::{self, OpenOptions},
    sync::Mutex,
};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fleetwatch_core::{
    config::{self, AppConfig},
    parse_identifier_list, FilterConfig, FilterMode, FleetMonitor, JsonFileStore, RefreshOutcome,
};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Lists vehicles that have no personnel assigned.
#[derive(Debug, Parser)]
#[command(name = "fleetwatch", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the fleet and list unassigned vehicles.
    List {
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show or edit the vehicle type filter.
    Filter {
        #[command(subcommand)]
        action: FilterAction,
    },
}

#[derive(Debug, Subcommand)]
enum FilterAction {
    /// Print the saved filter.
    Show,
    /// Replace parts of the saved filter.
    Set {
        /// How the type ids are applied.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
        /// Vehicle type ids separated by commas, e.g. "30,31,43".
        #[arg(long)]
        ids: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Exclude,
    IncludeOnly,
}

impl From<ModeArg> for FilterMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Exclude => FilterMode::Exclude,
            ModeArg::IncludeOnly => FilterMode::IncludeOnly,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    let store = JsonFileStore::new(config.settings_path.clone());
    let monitor = FleetMonitor::new(&config, store)?;

    match cli.command {
        Command::List { json } => match monitor.refresh().await {
            RefreshOutcome::Ready {
                result,
                catalog_warning,
            } => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    print!(
                        "{}",
                        present::render_list(
                            &config,
                            &result,
                            monitor.snapshot().map(|snapshot| snapshot.fetched_at),
                            catalog_warning.as_deref(),
                        )
                    );
                }
            }
            RefreshOutcome::Unavailable { reason } => {
                bail!("failed to load vehicle data: {reason}")
            }
            RefreshOutcome::Superseded => tracing::debug!("Refresh superseded"),
        },
        Command::Filter { action } => match action {
            FilterAction::Show => print!("{}", present::render_filter(&monitor.config())),
            FilterAction::Set { mode, ids } => {
                let current = monitor.config();
                let updated = FilterConfig {
                    type_ids: ids
                        .as_deref()
                        .map(parse_identifier_list)
                        .unwrap_or(current.type_ids),
                    mode: mode.map(FilterMode::from).unwrap_or(current.mode),
                };
                monitor.set_config(updated)?;
                print!("{}", present::render_filter(&monitor.config()));
            }
        },
    }

    Ok(())
}

fn init_logging() -> Result<()> {
    let cache_root = match dirs::cache_dir() {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let log_dir = cache_root.join("fleetwatch").join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("fleetwatch.log"))?;

    let env_filter = EnvFilter::from_default_env();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
