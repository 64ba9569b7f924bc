//! biocat common library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the biocat workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`CatalogError`] and the [`Result`] alias
//! - **Logging**: centralized `tracing` setup shared by the server and the loader
//!
//! # Example
//!
//! ```no_run
//! use biocat_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     tracing::info!("catalog starting");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{CatalogError, Result};
