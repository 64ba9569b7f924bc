//! Feature modules implementing the catalog API
//!
//! Each feature is a vertical slice with its own commands, queries and
//! routes.
//!
//! # Features
//!
//! - **proteins**: Protein aggregate create/update/delete, reads, coverage
//! - **pfams**: Pfam family lookups and per-taxon domain listings
//! - **organisms**: Organism get-or-create and duplicate pruning
//! - **forms**: HTML entry form for manual protein creation
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (create, update, delete)
//! - `queries/` - Read operations (get, list, coverage)
//! - `routes.rs` - HTTP route definitions
//! - `types.rs` - Wire types (if needed)
//!
//! Commands and queries implement the mediator pattern using the `mediator`
//! crate; every handler opens one store transaction.

pub mod forms;
pub mod organisms;
pub mod pfams;
pub mod proteins;
pub mod shared;

use axum::{routing::MethodRouter, Router};

use crate::config::CatalogConfig;
use crate::store::SharedStore;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    pub store: SharedStore,
    /// Page size for list requests that do not name a limit
    pub default_page_size: i64,
    /// Whether create resolves the organism by get-or-create
    pub create_reuses_organism: bool,
}

impl FeatureState {
    pub fn new(store: SharedStore, catalog: &CatalogConfig) -> Self {
        Self {
            store,
            default_page_size: catalog.default_page_size,
            create_reuses_organism: catalog.create_reuses_organism,
        }
    }
}

/// Route `path` both with and without a trailing slash
pub(crate) fn route_with_slash<S>(
    router: Router<S>,
    path: &str,
    method_router: MethodRouter<S>,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route(path, method_router.clone())
        .route(&format!("{}/", path), method_router)
}

/// Creates the router with every feature route mounted
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .merge(proteins::proteins_routes())
        .merge(pfams::pfams_routes())
        .merge(forms::forms_routes())
        .with_state(state)
}
