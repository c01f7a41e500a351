//! Diabetes Triage CLI
//!
//! Trains model artifacts for the prediction service and inspects
//! artifacts that are already on disk.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{inspect, train};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use triage_lib::ModelKind;

/// Diabetes Triage CLI
#[derive(Parser)]
#[command(name = "triage")]
#[command(author, version, about = "CLI for Diabetes Triage model training", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fit a model and write its artifacts
    Train {
        /// Model variant to fit: linear, ridge or rf
        #[arg(long, default_value = "linear")]
        model: ModelKind,

        /// Seed for the split and any stochastic estimator
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Version identifier; artifacts go to <out-dir>/<version>
        #[arg(long, default_value = "v0.1")]
        version: String,

        /// Fraction of rows held out for validation, in (0, 1)
        #[arg(long, default_value_t = 0.2)]
        test_size: f64,

        /// Root directory for model artifacts
        #[arg(long, env = "TRIAGE_OUT_DIR", default_value = "models")]
        out_dir: PathBuf,
    },

    /// Show metadata and metrics of a trained artifact
    Inspect {
        /// Version identifier to inspect
        #[arg(long, default_value = "v0.1")]
        version: String,

        /// Root directory for model artifacts
        #[arg(long, env = "TRIAGE_OUT_DIR", default_value = "models")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match cli.command {
        Commands::Train {
            model,
            seed,
            version,
            test_size,
            out_dir,
        } => {
            let config = triage_lib::TrainConfig {
                kind: model,
                seed,
                version,
                test_size,
                out_dir,
            };
            train::run_training(&config, cli.format)?;
        }
        Commands::Inspect { version, out_dir } => {
            inspect::show_artifact(&out_dir, &version, cli.format)?;
        }
    }

    Ok(())
}
