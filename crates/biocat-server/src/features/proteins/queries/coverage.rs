//! Domain coverage of a protein
//!
//! Coverage is the summed length of the protein's assignment intervals over
//! its declared `length`. Intervals are closed, so `[s, e]` spans
//! `e - s + 1` residues. Overlapping assignments are counted once each,
//! which lets coverage exceed 1.0.

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::store::{SharedStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageQuery {
    pub protein_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageResponse {
    pub coverage: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
    #[error("Protein '{0}' not found")]
    NotFound(String),
    #[error("Coverage of protein '{protein_id}' is undefined for length {length}")]
    Undefined { protein_id: String, length: i32 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Request<Result<CoverageResponse, CoverageError>> for CoverageQuery {}

impl crate::cqrs::middleware::Query for CoverageQuery {}

/// Summed interval spans over `length`; `None` when `length` is not positive
pub fn coverage_ratio(length: i32, spans: impl IntoIterator<Item = i64>) -> Option<f64> {
    if length <= 0 {
        return None;
    }
    let covered: i64 = spans.into_iter().sum();
    Some(covered as f64 / f64::from(length))
}

#[tracing::instrument(skip(store))]
pub async fn handle(
    store: SharedStore,
    query: CoverageQuery,
) -> Result<CoverageResponse, CoverageError> {
    let mut tx = store.begin().await?;
    let protein = tx
        .get_protein(&query.protein_id)
        .await?
        .ok_or_else(|| CoverageError::NotFound(query.protein_id.clone()))?;

    let details = tx.list_assignment_details(&protein.protein_id).await?;
    let coverage = coverage_ratio(protein.length, details.iter().map(|d| d.span())).ok_or(
        CoverageError::Undefined {
            protein_id: protein.protein_id,
            length: protein.length,
        },
    )?;

    Ok(CoverageResponse { coverage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::proteins::commands::create::{self, CreateProteinCommand};
    use crate::features::shared::test_helpers::{memory_store, sample_domain, sample_payload};

    #[test]
    fn test_ratio_full_span() {
        assert_eq!(coverage_ratio(18, [18]), Some(1.0));
    }

    #[test]
    fn test_ratio_no_assignments() {
        assert_eq!(coverage_ratio(100, std::iter::empty()), Some(0.0));
    }

    #[test]
    fn test_ratio_overlaps_double_count() {
        assert_eq!(coverage_ratio(10, [10, 5]), Some(1.5));
    }

    #[test]
    fn test_ratio_zero_length_is_undefined() {
        assert_eq!(coverage_ratio(0, [3]), None);
    }

    #[tokio::test]
    async fn test_handle_full_coverage() {
        let store = memory_store();
        let mut payload = sample_payload("P1");
        payload.length = Some(18);
        payload.domains = vec![sample_domain(1, 18)];
        create::handle(store.clone(), CreateProteinCommand::new(payload))
            .await
            .unwrap();

        let response = handle(
            store,
            CoverageQuery {
                protein_id: "P1".to_string(),
            },
        )
        .await
        .unwrap();
        assert!((response.coverage - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_handle_zero_length() {
        let store = memory_store();
        let mut payload = sample_payload("P1");
        payload.length = None;
        create::handle(store.clone(), CreateProteinCommand::new(payload))
            .await
            .unwrap();

        let err = handle(
            store,
            CoverageQuery {
                protein_id: "P1".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CoverageError::Undefined { length: 0, .. }));
    }

    #[tokio::test]
    async fn test_handle_unknown_protein() {
        let err = handle(
            memory_store(),
            CoverageQuery {
                protein_id: "P404".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CoverageError::NotFound(_)));
    }
}
