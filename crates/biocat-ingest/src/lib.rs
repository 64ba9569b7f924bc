//! biocat bulk loader
//!
//! Populates the catalog from three header-less CSV files:
//!
//! - `assignment_data_sequences.csv`: `protein_id,sequence`
//! - `assignment_data_set.csv`: one domain assignment per row, with the
//!   protein's organism and length
//! - `pfam_descriptions.csv`: `pfam_id,description`
//!
//! The loader writes through the same [`biocat_server::store::CatalogStore`]
//! and get-or-create resolvers as the HTTP API.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use biocat_ingest::{LoadFiles, Loader};
//! use biocat_server::store::MemoryCatalogStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut loader = Loader::new(Arc::new(MemoryCatalogStore::new()));
//!     let report = loader.run(&LoadFiles::in_dir("./data_files")).await?;
//!     println!("skipped {} rows", report.skipped());
//!     Ok(())
//! }
//! ```

pub mod loader;
pub mod rows;

pub use loader::{FileReport, LoadError, LoadFiles, LoadReport, Loader};
