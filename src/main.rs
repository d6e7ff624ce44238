//! clientsmith CLI entrypoint
//! Parses command-line arguments and dispatches to the generation use case.
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use clientsmith::application::GenerateClientsUseCase;
use clientsmith::output::FileSystemOutputSink;
use clientsmith::symbols::FileUniverseLoader;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clientsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Validate a symbol-universe snapshot and generate client sources
    Generate {
        /// Path to the symbol-universe snapshot (JSON)
        #[arg(long)]
        universe: PathBuf,
        /// Root directory generated sources are written under
        #[arg(long, default_value = "generated")]
        output_dir: PathBuf,
    },
    /// Validate a snapshot without writing anything
    Check {
        /// Path to the symbol-universe snapshot (JSON)
        #[arg(long)]
        universe: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Generate {
            universe,
            output_dir,
        } => {
            let universe_path = universe
                .to_str()
                .context("universe path is not valid UTF-8")?;
            let use_case = GenerateClientsUseCase::new(
                Arc::new(FileUniverseLoader::new()),
                Arc::new(FileSystemOutputSink::new(output_dir.clone())),
            );
            let report = use_case
                .execute(universe_path, false)
                .await
                .context("client generation failed")?;
            info!(
                "done: {} file(s) written, {} warning(s)",
                report.written, report.warnings
            );
        }
        Commands::Check { universe } => {
            let universe_path = universe
                .to_str()
                .context("universe path is not valid UTF-8")?;
            let use_case = GenerateClientsUseCase::new(
                Arc::new(FileUniverseLoader::new()),
                Arc::new(FileSystemOutputSink::new(PathBuf::new())),
            );
            let report = use_case
                .execute(universe_path, true)
                .await
                .context("validation failed")?;
            info!("check passed with {} warning(s)", report.warnings);
        }
    }
    Ok(())
}
