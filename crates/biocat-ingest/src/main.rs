//! biocat-ingest - bulk CSV loader

use std::path::PathBuf;

use anyhow::Result;
use biocat_common::logging::{init_logging, LogConfig, LogLevel};
use biocat_ingest::{loader, LoadFiles, Loader};
use biocat_server::{api, config::Config, config::StoreBackend};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "biocat-ingest")]
#[command(author, version, about = "Load the protein catalog from CSV files")]
struct Cli {
    /// Directory holding the input files
    #[arg(short, long, default_value = "./data_files")]
    data_dir: PathBuf,

    /// Sequences file, relative to the data directory
    #[arg(long, default_value = loader::SEQUENCES_FILE)]
    sequences: PathBuf,

    /// Assignment data set file, relative to the data directory
    #[arg(long, default_value = loader::ASSIGNMENT_DATA_SET_FILE)]
    assignment_data_set: PathBuf,

    /// Pfam descriptions file, relative to the data directory
    #[arg(long, default_value = loader::PFAM_DESCRIPTIONS_FILE)]
    pfam_descriptions: PathBuf,

    /// Store backend; `memory` only validates the files
    #[arg(long, env = "BIOCAT_STORE")]
    store: Option<StoreBackend>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("biocat-ingest")
        .filter_directives("biocat_ingest=debug,biocat_server=info,sqlx=warn")
        .build()
        .merge_env()?;
    let _log_guard = init_logging(&log_config)?;

    let mut config = Config::load()?;
    if let Some(store) = cli.store {
        config.catalog.store = store;
    }
    let store = api::build_store(&config).await?;

    let files = LoadFiles {
        sequences: cli.data_dir.join(&cli.sequences),
        assignment_data_set: cli.data_dir.join(&cli.assignment_data_set),
        pfam_descriptions: cli.data_dir.join(&cli.pfam_descriptions),
    };
    info!(data_dir = %cli.data_dir.display(), store = ?config.catalog.store, "Starting load");

    let report = Loader::new(store).run(&files).await?;
    if report.skipped() > 0 {
        tracing::warn!(skipped = report.skipped(), "Some rows were skipped; see warnings above");
    }

    Ok(())
}
