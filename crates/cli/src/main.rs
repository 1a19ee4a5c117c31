//! volscope - main entry point
//!
//! Analyzes every `Date`/`Close` CSV in a directory: rolling volatility,
//! regime labels, a volatility-contrarian backtest and forward scenarios.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use volscope::commands::analyze::{self, AnalyzeArgs};

#[derive(Parser, Debug)]
#[command(name = "volscope")]
#[command(
    about = "Volatility regime analysis, backtest and projection for daily prices",
    long_about = None
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze every CSV file in a directory
    Analyze {
        /// Directory containing one CSV file per asset
        #[arg(short, long, default_value = "dataCrypto")]
        data_dir: PathBuf,

        /// Directory receiving per-asset result files
        #[arg(short, long, default_value = "graphiques")]
        output_dir: PathBuf,

        /// Path to a JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Starting capital (overrides config file)
        #[arg(long)]
        capital: Option<f64>,

        /// Worker threads (0 = one per core)
        #[arg(short, long, default_value = "0")]
        workers: usize,

        /// Print summaries only, write no files
        #[arg(long)]
        no_export: bool,
    },
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();

    debug!("Logging initialized at {}", level);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            data_dir,
            output_dir,
            config,
            capital,
            workers,
            no_export,
        } => {
            analyze::run(&AnalyzeArgs {
                data_dir,
                output_dir,
                config,
                capital,
                workers,
                no_export,
            })?;
            Ok(())
        }
    }
}
