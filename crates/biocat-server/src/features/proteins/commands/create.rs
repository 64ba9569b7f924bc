use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::features::organisms::get_or_create_organism;
use crate::features::proteins::assignments::{attach_domain, AttachMode};
use crate::features::proteins::types::{load_aggregate, ProteinAggregate, ProteinPayload};
use crate::features::shared::InvalidFields;
use crate::models::Protein;
use crate::store::{SharedStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProteinCommand {
    pub payload: ProteinPayload,
    /// Resolve the organism by get-or-create instead of always inserting it
    #[serde(default)]
    pub reuse_existing_organism: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateProteinError {
    #[error(transparent)]
    InvalidFields(#[from] InvalidFields),
    #[error("Protein '{0}' already exists")]
    DuplicateProtein(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Request<Result<ProteinAggregate, CreateProteinError>> for CreateProteinCommand {}

impl crate::cqrs::middleware::Command for CreateProteinCommand {}

impl CreateProteinCommand {
    pub fn new(payload: ProteinPayload) -> Self {
        Self {
            payload,
            reuse_existing_organism: false,
        }
    }
}

/// Create a protein with its organism and domain assignments in one transaction
#[tracing::instrument(skip(store, command), fields(protein_id = ?command.payload.protein_id))]
pub async fn handle(
    store: SharedStore,
    command: CreateProteinCommand,
) -> Result<ProteinAggregate, CreateProteinError> {
    let input = command.payload.into_input()?;

    let mut tx = store.begin().await?;

    let organism = if command.reuse_existing_organism {
        get_or_create_organism(tx.as_mut(), &input.organism).await?.0
    } else {
        tx.insert_organism(&input.organism).await?
    };

    let protein = Protein {
        protein_id: input.protein_id.clone(),
        sequence: input.sequence,
        length: input.length,
        id_custom: input.id_custom,
        organism_id: organism.id,
    };
    tx.insert_protein(&protein).await.map_err(|e| {
        if e.is_unique_violation() {
            CreateProteinError::DuplicateProtein(input.protein_id.clone())
        } else {
            e.into()
        }
    })?;

    for entry in &input.domains {
        attach_domain(tx.as_mut(), &input.protein_id, entry, AttachMode::Insert).await?;
    }

    let aggregate = load_aggregate(tx.as_mut(), &input.protein_id)
        .await?
        .ok_or_else(|| StoreError::missing("protein", &input.protein_id))?;
    tx.commit().await?;

    tracing::info!(
        protein_id = %aggregate.protein_id,
        organism_id = aggregate.taxonomy.id,
        domains = aggregate.domains.len(),
        "Protein created"
    );

    Ok(aggregate)
}
