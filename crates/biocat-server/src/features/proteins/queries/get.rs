use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::features::proteins::types::{load_aggregate, ProteinAggregate};
use crate::store::{SharedStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProteinQuery {
    pub protein_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GetProteinError {
    #[error("Protein '{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Request<Result<ProteinAggregate, GetProteinError>> for GetProteinQuery {}

impl crate::cqrs::middleware::Query for GetProteinQuery {}

#[tracing::instrument(skip(store))]
pub async fn handle(
    store: SharedStore,
    query: GetProteinQuery,
) -> Result<ProteinAggregate, GetProteinError> {
    let mut tx = store.begin().await?;
    load_aggregate(tx.as_mut(), &query.protein_id)
        .await?
        .ok_or(GetProteinError::NotFound(query.protein_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::proteins::commands::create::{self, CreateProteinCommand};
    use crate::features::shared::test_helpers::{memory_store, sample_payload};

    #[tokio::test]
    async fn test_round_trip() {
        let store = memory_store();
        let created = create::handle(store.clone(), CreateProteinCommand::new(sample_payload("P1")))
            .await
            .unwrap();

        let fetched = handle(
            store,
            GetProteinQuery {
                protein_id: "P1".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_not_found() {
        let result = handle(
            memory_store(),
            GetProteinQuery {
                protein_id: "missing".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(GetProteinError::NotFound(_))));
    }
}
