//! Pfam API routes
//!
//! - `GET /api/pfam/:domain_id/` - Pfam family detail
//! - `GET /api/pfams/:taxa_id/` - Distinct domains found on proteins of a taxon

use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};

use super::queries::{
    get, list_by_taxa, DomainByTaxaItem, GetPfamError, GetPfamQuery, ListPfamsByTaxaError,
    ListPfamsByTaxaQuery,
};
use crate::error::AppError;
use crate::features::{route_with_slash, FeatureState};
use crate::models::Pfam;

pub fn pfams_routes() -> Router<FeatureState> {
    let router = Router::new();
    let router = route_with_slash(router, "/api/pfam/:domain_id", get(get_pfam));
    route_with_slash(router, "/api/pfams/:taxa_id", get(list_pfams_by_taxa))
}

#[tracing::instrument(skip(state))]
async fn get_pfam(
    State(state): State<FeatureState>,
    Path(domain_id): Path<String>,
) -> Result<Json<Pfam>, AppError> {
    let pfam = get::handle(state.store, GetPfamQuery { domain_id }).await?;
    Ok(Json(pfam))
}

#[tracing::instrument(skip(state, path))]
async fn list_pfams_by_taxa(
    State(state): State<FeatureState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<DomainByTaxaItem>>, AppError> {
    let Path(taxa_id) = path?;
    let items = list_by_taxa::handle(state.store, ListPfamsByTaxaQuery { taxa_id }).await?;
    Ok(Json(items))
}

impl From<GetPfamError> for AppError {
    fn from(err: GetPfamError) -> Self {
        match err {
            GetPfamError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetPfamError::Store(e) => e.into(),
        }
    }
}

impl From<ListPfamsByTaxaError> for AppError {
    fn from(err: ListPfamsByTaxaError) -> Self {
        match err {
            ListPfamsByTaxaError::Store(e) => e.into(),
        }
    }
}
