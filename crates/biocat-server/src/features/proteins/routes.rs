//! Protein API routes
//!
//! # Route Structure
//!
//! - `POST /api/protein/` - Create a protein aggregate
//! - `GET /api/protein/` - List aggregates (`?limit=&offset=`)
//! - `GET /api/protein/:protein_id/` - Get one aggregate
//! - `PUT /api/protein/:protein_id/` - Merge a payload into an aggregate
//! - `DELETE /api/protein/:protein_id/` - Delete a protein
//! - `GET /api/proteins/:taxa_id/` - Proteins whose organism has `taxa_id`
//! - `GET /api/coverage/:protein_id/` - Domain coverage ratio
//!
//! Every path is also routed without its trailing slash.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::commands::{
    create, delete, update, CreateProteinCommand, CreateProteinError, DeleteProteinCommand,
    DeleteProteinError, UpdateProteinCommand, UpdateProteinError,
};
use super::queries::{
    coverage, get as get_query, list, list_by_taxa, CoverageError, CoverageQuery,
    CoverageResponse, GetProteinError, GetProteinQuery, ListProteinsByTaxaError,
    ListProteinsByTaxaQuery, ListProteinsError, ListProteinsQuery, ProteinByTaxaItem,
};
use super::types::{ProteinAggregate, ProteinPayload};
use crate::error::AppError;
use crate::features::shared::{Paginated, PaginationParams};
use crate::features::{route_with_slash, FeatureState};

pub fn proteins_routes() -> Router<FeatureState> {
    let router = Router::new();
    let router = route_with_slash(
        router,
        "/api/protein",
        get(list_proteins).post(create_protein),
    );
    let router = route_with_slash(
        router,
        "/api/protein/:protein_id",
        get(get_protein).put(update_protein).delete(delete_protein),
    );
    let router = route_with_slash(router, "/api/proteins/:taxa_id", get(list_proteins_by_taxa));
    route_with_slash(router, "/api/coverage/:protein_id", get(get_coverage))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// `201 Created` with the stored aggregate
#[tracing::instrument(skip(state, payload))]
async fn create_protein(
    State(state): State<FeatureState>,
    payload: Result<Json<ProteinPayload>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;
    let command = CreateProteinCommand {
        payload,
        reuse_existing_organism: state.create_reuses_organism,
    };
    let aggregate = create::handle(state.store, command).await?;
    Ok((StatusCode::CREATED, Json(aggregate)).into_response())
}

#[tracing::instrument(skip(state, payload))]
async fn update_protein(
    State(state): State<FeatureState>,
    Path(protein_id): Path<String>,
    payload: Result<Json<ProteinPayload>, JsonRejection>,
) -> Result<Json<ProteinAggregate>, AppError> {
    let Json(payload) = payload?;
    let aggregate = update::handle(
        state.store,
        UpdateProteinCommand {
            protein_id,
            payload,
        },
    )
    .await?;
    Ok(Json(aggregate))
}

/// `204 No Content`
#[tracing::instrument(skip(state))]
async fn delete_protein(
    State(state): State<FeatureState>,
    Path(protein_id): Path<String>,
) -> Result<StatusCode, AppError> {
    delete::handle(state.store, DeleteProteinCommand { protein_id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(state))]
async fn get_protein(
    State(state): State<FeatureState>,
    Path(protein_id): Path<String>,
) -> Result<Json<ProteinAggregate>, AppError> {
    let aggregate = get_query::handle(state.store, GetProteinQuery { protein_id }).await?;
    Ok(Json(aggregate))
}

#[tracing::instrument(skip(state, params))]
async fn list_proteins(
    State(state): State<FeatureState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<Paginated<ProteinAggregate>>, AppError> {
    let Query(pagination) = params?;
    let page = list::handle(
        state.store,
        ListProteinsQuery {
            pagination,
            default_limit: state.default_page_size,
        },
    )
    .await?;
    Ok(Json(page))
}

#[tracing::instrument(skip(state, path))]
async fn list_proteins_by_taxa(
    State(state): State<FeatureState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<ProteinByTaxaItem>>, AppError> {
    let Path(taxa_id) = path?;
    let items = list_by_taxa::handle(state.store, ListProteinsByTaxaQuery { taxa_id }).await?;
    Ok(Json(items))
}

#[tracing::instrument(skip(state))]
async fn get_coverage(
    State(state): State<FeatureState>,
    Path(protein_id): Path<String>,
) -> Result<Json<CoverageResponse>, AppError> {
    let response = coverage::handle(state.store, CoverageQuery { protein_id }).await?;
    Ok(Json(response))
}

// ============================================================================
// Error Mapping
// ============================================================================

impl From<CreateProteinError> for AppError {
    fn from(err: CreateProteinError) -> Self {
        match err {
            CreateProteinError::InvalidFields(errors) => AppError::invalid_fields(errors),
            CreateProteinError::DuplicateProtein(_) => AppError::Conflict(err.to_string()),
            CreateProteinError::Store(e) => e.into(),
        }
    }
}

impl From<UpdateProteinError> for AppError {
    fn from(err: UpdateProteinError) -> Self {
        match err {
            UpdateProteinError::InvalidFields(errors) => AppError::invalid_fields(errors),
            UpdateProteinError::IdMismatch { .. } => AppError::validation(err.to_string()),
            UpdateProteinError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateProteinError::Store(e) => e.into(),
        }
    }
}

impl From<DeleteProteinError> for AppError {
    fn from(err: DeleteProteinError) -> Self {
        match err {
            DeleteProteinError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteProteinError::Store(e) => e.into(),
        }
    }
}

impl From<GetProteinError> for AppError {
    fn from(err: GetProteinError) -> Self {
        match err {
            GetProteinError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetProteinError::Store(e) => e.into(),
        }
    }
}

impl From<ListProteinsError> for AppError {
    fn from(err: ListProteinsError) -> Self {
        match err {
            ListProteinsError::InvalidPagination(message) => AppError::validation(message),
            ListProteinsError::Store(e) => e.into(),
        }
    }
}

impl From<ListProteinsByTaxaError> for AppError {
    fn from(err: ListProteinsByTaxaError) -> Self {
        match err {
            ListProteinsByTaxaError::Store(e) => e.into(),
        }
    }
}

impl From<CoverageError> for AppError {
    fn from(err: CoverageError) -> Self {
        match err {
            CoverageError::NotFound(_) => AppError::NotFound(err.to_string()),
            CoverageError::Undefined { .. } => AppError::UndefinedCoverage(err.to_string()),
            CoverageError::Store(e) => e.into(),
        }
    }
}
