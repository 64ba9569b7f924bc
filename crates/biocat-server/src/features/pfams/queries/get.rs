use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::models::Pfam;
use crate::store::{SharedStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPfamQuery {
    pub domain_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GetPfamError {
    #[error("Pfam '{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Request<Result<Pfam, GetPfamError>> for GetPfamQuery {}

impl crate::cqrs::middleware::Query for GetPfamQuery {}

#[tracing::instrument(skip(store))]
pub async fn handle(store: SharedStore, query: GetPfamQuery) -> Result<Pfam, GetPfamError> {
    let mut tx = store.begin().await?;
    tx.get_pfam(&query.domain_id)
        .await?
        .ok_or(GetPfamError::NotFound(query.domain_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCatalogStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_handle_not_found() {
        let store: SharedStore = Arc::new(MemoryCatalogStore::new());
        let result = handle(
            store,
            GetPfamQuery {
                domain_id: "PF99999".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(GetPfamError::NotFound(id)) if id == "PF99999"));
    }

    #[tokio::test]
    async fn test_handle_returns_stored_family() {
        let store: SharedStore = Arc::new(MemoryCatalogStore::new());
        let mut tx = store.begin().await.unwrap();
        tx.insert_pfam(&Pfam {
            domain_id: "PF00001".to_string(),
            domain_description: "7 transmembrane receptor".to_string(),
        })
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let pfam = handle(
            store,
            GetPfamQuery {
                domain_id: "PF00001".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(pfam.domain_description, "7 transmembrane receptor");
    }
}
