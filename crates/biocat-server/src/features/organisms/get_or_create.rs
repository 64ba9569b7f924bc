//! Get-or-create for organisms keyed by `(taxa_id, clade, genus, species)`
//!
//! These run inside the caller's transaction. A concurrent writer that wins
//! the race makes the insert fail with a unique violation, which is returned
//! as-is.

use std::collections::HashSet;

use crate::models::{Organism, OrganismFields};
use crate::store::{CatalogTx, StoreResult};

/// Find the organism with this natural key or insert it
///
/// Returns the row and whether it was created.
#[tracing::instrument(skip(tx))]
pub async fn get_or_create_organism(
    tx: &mut dyn CatalogTx,
    fields: &OrganismFields,
) -> StoreResult<(Organism, bool)> {
    if let Some(organism) = tx.find_organism(fields).await? {
        return Ok((organism, false));
    }
    let organism = tx.insert_organism(fields).await?;
    tracing::debug!(organism_id = organism.id, "Created organism");
    Ok((organism, true))
}

/// Keep the lowest-id organism of each natural key and delete the rest
///
/// Deleting an organism cascades to its proteins. Returns how many rows were
/// removed; zero whenever the store enforces the natural-key constraint.
#[tracing::instrument(skip(tx))]
pub async fn prune_duplicate_organisms(tx: &mut dyn CatalogTx) -> StoreResult<u64> {
    let mut seen = HashSet::new();
    let mut removed = 0;
    for organism in tx.list_organisms().await? {
        if !seen.insert(organism.fields()) && tx.delete_organism(organism.id).await? {
            removed += 1;
        }
    }
    if removed > 0 {
        tracing::info!(removed, "Pruned duplicate organisms");
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CatalogStore, MemoryCatalogStore};

    fn fields() -> OrganismFields {
        OrganismFields {
            taxa_id: Some(568076),
            clade: "E".to_string(),
            genus: "Metarhizium".to_string(),
            species: "robertsii".to_string(),
        }
    }

    #[tokio::test]
    async fn test_second_call_reuses_row() {
        let store = MemoryCatalogStore::new();
        let mut tx = store.begin().await.unwrap();

        let (first, created) = get_or_create_organism(tx.as_mut(), &fields()).await.unwrap();
        assert!(created);
        let (second, created) = get_or_create_organism(tx.as_mut(), &fields()).await.unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(tx.list_organisms().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_prune_without_duplicates_is_noop() {
        let store = MemoryCatalogStore::new();
        let mut tx = store.begin().await.unwrap();
        get_or_create_organism(tx.as_mut(), &fields()).await.unwrap();

        assert_eq!(prune_duplicate_organisms(tx.as_mut()).await.unwrap(), 0);
        assert_eq!(tx.list_organisms().await.unwrap().len(), 1);
    }
}
