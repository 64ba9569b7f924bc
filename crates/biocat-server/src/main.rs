//! biocat server - Main entry point

use anyhow::Result;
use biocat_common::logging::{init_logging, LogConfig};
use tracing::info;

use biocat_server::{api, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Environment variables take precedence over these defaults
    let log_config = LogConfig::builder()
        .log_file_prefix("biocat-server")
        .filter_directives("biocat_server=debug,tower_http=debug,sqlx=info")
        .build()
        .merge_env()?;

    // Held until exit so buffered file output is flushed
    let _log_guard = init_logging(&log_config)?;

    info!("Starting biocat server");

    let config = Config::load()?;
    info!(
        store = ?config.catalog.store,
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    api::serve(config).await
}
