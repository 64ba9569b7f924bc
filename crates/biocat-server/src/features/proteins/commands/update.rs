use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::features::organisms::get_or_create_organism;
use crate::features::proteins::assignments::{attach_domain, AttachMode};
use crate::features::proteins::types::{load_aggregate, ProteinAggregate, ProteinPayload};
use crate::features::shared::InvalidFields;
use crate::models::Protein;
use crate::store::{SharedStore, StoreError};

/// Merge a payload into an existing protein
///
/// Assignments absent from the payload are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProteinCommand {
    pub protein_id: String,
    pub payload: ProteinPayload,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateProteinError {
    #[error(transparent)]
    InvalidFields(#[from] InvalidFields),
    #[error("Payload protein_id '{payload}' does not match '{path}'")]
    IdMismatch { path: String, payload: String },
    #[error("Protein '{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Request<Result<ProteinAggregate, UpdateProteinError>> for UpdateProteinCommand {}

impl crate::cqrs::middleware::Command for UpdateProteinCommand {}

impl UpdateProteinCommand {
    pub fn validate(&self) -> Result<(), UpdateProteinError> {
        match self.payload.protein_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() && id != self.protein_id => {
                Err(UpdateProteinError::IdMismatch {
                    path: self.protein_id.clone(),
                    payload: id.to_string(),
                })
            },
            _ => Ok(()),
        }
    }
}

#[tracing::instrument(skip(store, command), fields(protein_id = %command.protein_id))]
pub async fn handle(
    store: SharedStore,
    command: UpdateProteinCommand,
) -> Result<ProteinAggregate, UpdateProteinError> {
    command.validate()?;

    let protein_id = command.protein_id;
    let mut payload = command.payload;
    payload.protein_id = Some(protein_id.clone());
    let input = payload.into_input()?;

    let mut tx = store.begin().await?;

    if tx.get_protein(&protein_id).await?.is_none() {
        return Err(UpdateProteinError::NotFound(protein_id));
    }

    let (organism, created) = get_or_create_organism(tx.as_mut(), &input.organism).await?;
    let organism = if created {
        organism
    } else {
        tx.update_organism(organism.id, &input.organism).await?
    };

    tx.update_protein(&Protein {
        protein_id: protein_id.clone(),
        sequence: input.sequence,
        length: input.length,
        id_custom: input.id_custom,
        organism_id: organism.id,
    })
    .await?;

    for entry in &input.domains {
        attach_domain(tx.as_mut(), &protein_id, entry, AttachMode::Merge).await?;
    }

    let aggregate = load_aggregate(tx.as_mut(), &protein_id)
        .await?
        .ok_or_else(|| StoreError::missing("protein", &protein_id))?;
    tx.commit().await?;

    tracing::info!(
        protein_id = %aggregate.protein_id,
        organism_id = aggregate.taxonomy.id,
        domains = aggregate.domains.len(),
        "Protein updated"
    );

    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::proteins::commands::create::{self, CreateProteinCommand};
    use crate::features::shared::test_helpers::{memory_store, sample_domain, sample_payload};
    use crate::store::CatalogStore;

    fn update(protein_id: &str, payload: ProteinPayload) -> UpdateProteinCommand {
        UpdateProteinCommand {
            protein_id: protein_id.to_string(),
            payload,
        }
    }

    #[test]
    fn test_validation_rejects_mismatched_id() {
        let command = update("P1", sample_payload("P2"));
        assert!(matches!(
            command.validate(),
            Err(UpdateProteinError::IdMismatch { .. })
        ));
    }

    #[test]
    fn test_validation_accepts_absent_id() {
        let mut payload = sample_payload("P1");
        payload.protein_id = None;
        assert!(update("P1", payload).validate().is_ok());
    }

    #[tokio::test]
    async fn test_unknown_protein_is_not_found() {
        let store = memory_store();
        let err = handle(store, update("P404", sample_payload("P404")))
            .await
            .unwrap_err();
        assert!(matches!(err, UpdateProteinError::NotFound(ref id) if id == "P404"));
    }

    #[tokio::test]
    async fn test_update_merges_assignments_and_scalars() {
        let store = memory_store();
        create::handle(store.clone(), CreateProteinCommand::new(sample_payload("P1")))
            .await
            .unwrap();

        let mut payload = sample_payload("P1");
        payload.sequence = Some("MKV".to_string());
        payload.length = Some(120);
        payload.domains = vec![sample_domain(40, 94), sample_domain(100, 110)];

        let aggregate = handle(store.clone(), update("P1", payload)).await.unwrap();
        assert_eq!(aggregate.sequence, "MKV");
        assert_eq!(aggregate.length, 120);
        assert_eq!(aggregate.domains.len(), 2);

        // Entries left out of a later update are kept
        let mut payload = sample_payload("P1");
        payload.domains.clear();
        let aggregate = handle(store, update("P1", payload)).await.unwrap();
        assert_eq!(aggregate.domains.len(), 2);
    }

    #[tokio::test]
    async fn test_update_reuses_existing_organism() {
        let store = memory_store();
        let created = create::handle(store.clone(), CreateProteinCommand::new(sample_payload("P1")))
            .await
            .unwrap();

        let aggregate = handle(store.clone(), update("P1", sample_payload("P1")))
            .await
            .unwrap();
        assert_eq!(aggregate.taxonomy.id, created.taxonomy.id);

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.list_organisms().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_rebinds_to_new_organism() {
        let store = memory_store();
        let created = create::handle(store.clone(), CreateProteinCommand::new(sample_payload("P1")))
            .await
            .unwrap();

        let mut payload = sample_payload("P1");
        if let Some(taxonomy) = payload.taxonomy.as_mut() {
            taxonomy.taxa_id = Some(Some(9606));
            taxonomy.genus = Some("Homo".to_string());
            taxonomy.species = Some("sapiens".to_string());
        }
        let aggregate = handle(store, update("P1", payload)).await.unwrap();
        assert_ne!(aggregate.taxonomy.id, created.taxonomy.id);
        assert_eq!(aggregate.taxonomy.taxa_id, Some(9606));
    }
}
