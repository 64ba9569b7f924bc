use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::store::{SharedStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListProteinsByTaxaQuery {
    pub taxa_id: i32,
}

/// `id` carries the protein's externally assigned `id_custom`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinByTaxaItem {
    pub id: Option<i32>,
    pub protein_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ListProteinsByTaxaError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Request<Result<Vec<ProteinByTaxaItem>, ListProteinsByTaxaError>> for ListProteinsByTaxaQuery {}

impl crate::cqrs::middleware::Query for ListProteinsByTaxaQuery {}

#[tracing::instrument(skip(store))]
pub async fn handle(
    store: SharedStore,
    query: ListProteinsByTaxaQuery,
) -> Result<Vec<ProteinByTaxaItem>, ListProteinsByTaxaError> {
    let mut tx = store.begin().await?;
    let proteins = tx.list_proteins_by_taxa(query.taxa_id).await?;
    Ok(proteins
        .into_iter()
        .map(|p| ProteinByTaxaItem {
            id: p.id_custom,
            protein_id: p.protein_id,
        })
        .collect())
}
