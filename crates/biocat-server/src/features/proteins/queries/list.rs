use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PAGE_SIZE;
use crate::features::proteins::types::{load_aggregate, ProteinAggregate};
use crate::features::shared::{Paginated, PaginationParams};
use crate::store::{SharedStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListProteinsQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,
    /// Page size used when the request does not name one
    #[serde(skip, default = "default_page_size")]
    pub default_limit: i64,
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, thiserror::Error)]
pub enum ListProteinsError {
    #[error("{0}")]
    InvalidPagination(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Request<Result<Paginated<ProteinAggregate>, ListProteinsError>> for ListProteinsQuery {}

impl crate::cqrs::middleware::Query for ListProteinsQuery {}

impl ListProteinsQuery {
    pub fn validate(&self) -> Result<(), ListProteinsError> {
        self.pagination
            .validate()
            .map_err(ListProteinsError::InvalidPagination)
    }
}

/// Page through protein aggregates ordered by `protein_id`
#[tracing::instrument(skip(store))]
pub async fn handle(
    store: SharedStore,
    query: ListProteinsQuery,
) -> Result<Paginated<ProteinAggregate>, ListProteinsError> {
    query.validate()?;

    let limit = query.pagination.limit(query.default_limit);
    let offset = query.pagination.offset();

    let mut tx = store.begin().await?;
    let total = tx.count_proteins().await?;
    let proteins = tx.list_proteins(limit, offset).await?;

    let mut results = Vec::with_capacity(proteins.len());
    for protein in proteins {
        if let Some(aggregate) = load_aggregate(tx.as_mut(), &protein.protein_id).await? {
            results.push(aggregate);
        }
    }

    Ok(Paginated::new(results, total, limit, offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::proteins::commands::create::{self, CreateProteinCommand};
    use crate::features::shared::test_helpers::{memory_store, sample_payload};

    fn query(limit: Option<i64>, offset: Option<i64>) -> ListProteinsQuery {
        ListProteinsQuery {
            pagination: PaginationParams::new(limit, offset),
            default_limit: DEFAULT_PAGE_SIZE,
        }
    }

    #[tokio::test]
    async fn test_pages_in_protein_id_order() {
        let store = memory_store();
        for id in ["P3", "P1", "P2"] {
            let mut command = CreateProteinCommand::new(sample_payload(id));
            command.reuse_existing_organism = true;
            create::handle(store.clone(), command).await.unwrap();
        }

        let first = handle(store.clone(), query(None, None)).await.unwrap();
        assert_eq!(first.count, 3);
        assert_eq!(first.results.len(), 1);
        assert_eq!(first.results[0].protein_id, "P1");
        assert!(first.has_next);

        let rest = handle(store, query(Some(10), Some(1))).await.unwrap();
        let ids: Vec<_> = rest.results.iter().map(|p| p.protein_id.as_str()).collect();
        assert_eq!(ids, vec!["P2", "P3"]);
        assert!(!rest.has_next);
    }

    #[tokio::test]
    async fn test_invalid_limit() {
        let result = handle(memory_store(), query(Some(0), None)).await;
        assert!(matches!(result, Err(ListProteinsError::InvalidPagination(_))));
    }
}
