use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::store::{SharedStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteProteinCommand {
    pub protein_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteProteinError {
    #[error("Protein '{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Request<Result<(), DeleteProteinError>> for DeleteProteinCommand {}

impl crate::cqrs::middleware::Command for DeleteProteinCommand {}

/// Delete a protein; its domain assignments go with it
#[tracing::instrument(skip(store))]
pub async fn handle(store: SharedStore, command: DeleteProteinCommand) -> Result<(), DeleteProteinError> {
    let mut tx = store.begin().await?;
    if !tx.delete_protein(&command.protein_id).await? {
        return Err(DeleteProteinError::NotFound(command.protein_id));
    }
    tx.commit().await?;

    tracing::info!(protein_id = %command.protein_id, "Protein deleted");
    Ok(())
}
