//! Get-or-create for Pfam families and their domains

use crate::models::{Domain, Pfam};
use crate::store::{CatalogTx, StoreResult};

/// Find the Pfam family by `domain_id` or insert it
///
/// An existing family keeps its stored description.
#[tracing::instrument(skip(tx), fields(domain_id = %pfam.domain_id))]
pub async fn get_or_create_pfam(tx: &mut dyn CatalogTx, pfam: &Pfam) -> StoreResult<(Pfam, bool)> {
    if let Some(existing) = tx.get_pfam(&pfam.domain_id).await? {
        return Ok((existing, false));
    }
    let created = tx.insert_pfam(pfam).await?;
    Ok((created, true))
}

/// First domain classified by `pfam_id`, or a new one described by `description`
#[tracing::instrument(skip(tx, description))]
pub async fn get_or_create_domain(
    tx: &mut dyn CatalogTx,
    pfam_id: &str,
    description: &str,
) -> StoreResult<(Domain, bool)> {
    if let Some(existing) = tx.first_domain_for_pfam(pfam_id).await? {
        return Ok((existing, false));
    }
    let created = tx.insert_domain(description, Some(pfam_id)).await?;
    Ok((created, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CatalogStore, MemoryCatalogStore};

    fn pfam(description: &str) -> Pfam {
        Pfam {
            domain_id: "PF01650".to_string(),
            domain_description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_existing_pfam_is_not_overwritten() {
        let store = MemoryCatalogStore::new();
        let mut tx = store.begin().await.unwrap();

        let (_, created) = get_or_create_pfam(tx.as_mut(), &pfam("Peptidase C13 family"))
            .await
            .unwrap();
        assert!(created);

        let (existing, created) = get_or_create_pfam(tx.as_mut(), &pfam("Something else"))
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(existing.domain_description, "Peptidase C13 family");
    }

    #[tokio::test]
    async fn test_domain_is_shared_per_pfam() {
        let store = MemoryCatalogStore::new();
        let mut tx = store.begin().await.unwrap();
        get_or_create_pfam(tx.as_mut(), &pfam("Peptidase C13 family"))
            .await
            .unwrap();

        let (first, created) = get_or_create_domain(tx.as_mut(), "PF01650", "legumain")
            .await
            .unwrap();
        assert!(created);
        assert_eq!(first.domain_description, "legumain");

        let (second, created) = get_or_create_domain(tx.as_mut(), "PF01650", "other text")
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
    }
}
