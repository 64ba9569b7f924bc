//! biocat server library
//!
//! HTTP service for a protein catalog: proteins, their source organisms,
//! Pfam families and the domain spans assigned to each protein.
//!
//! # Architecture
//!
//! Handlers follow a CQRS split:
//!
//! - **Commands** (create, update, delete a protein aggregate) run inside a
//!   single store transaction that either commits fully or leaves nothing
//!   behind.
//! - **Queries** (protein detail, listings by taxon, coverage, Pfam detail)
//!   only read.
//!
//! Each feature under [`features`] owns its commands, queries and routes.
//! Persistence goes through the [`store::CatalogStore`] trait, backed by
//! PostgreSQL in production and by an in-memory store for tests and demos.
//!
//! # Example
//!
//! ```no_run
//! use biocat_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod models;
pub mod store;

pub use error::AppError;
