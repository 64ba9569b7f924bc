use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::models::{DomainWithPfam, Pfam};
use crate::store::{SharedStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPfamsByTaxaQuery {
    pub taxa_id: i32,
}

/// A domain found in a taxon, with its Pfam family when it has one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainByTaxaItem {
    pub id: i64,
    pub pfam_id: Option<Pfam>,
}

impl From<DomainWithPfam> for DomainByTaxaItem {
    fn from(row: DomainWithPfam) -> Self {
        let pfam_id = match (row.pfam_id, row.pfam_description) {
            (Some(domain_id), Some(domain_description)) => Some(Pfam {
                domain_id,
                domain_description,
            }),
            _ => None,
        };
        Self { id: row.id, pfam_id }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListPfamsByTaxaError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Request<Result<Vec<DomainByTaxaItem>, ListPfamsByTaxaError>> for ListPfamsByTaxaQuery {}

impl crate::cqrs::middleware::Query for ListPfamsByTaxaQuery {}

#[tracing::instrument(skip(store))]
pub async fn handle(
    store: SharedStore,
    query: ListPfamsByTaxaQuery,
) -> Result<Vec<DomainByTaxaItem>, ListPfamsByTaxaError> {
    let mut tx = store.begin().await?;
    let rows = tx.list_domains_by_taxa(query.taxa_id).await?;
    Ok(rows.into_iter().map(DomainByTaxaItem::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_without_pfam() {
        let item = DomainByTaxaItem::from(DomainWithPfam {
            id: 4,
            pfam_id: None,
            pfam_description: None,
        });
        assert_eq!(item.id, 4);
        assert!(item.pfam_id.is_none());
    }

    #[test]
    fn test_item_serializes_nested_pfam() {
        let item = DomainByTaxaItem::from(DomainWithPfam {
            id: 1,
            pfam_id: Some("PF01650".to_string()),
            pfam_description: Some("Peptidase C13 family".to_string()),
        });
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["pfam_id"]["domain_id"], "PF01650");
        assert_eq!(json["pfam_id"]["domain_description"], "Peptidase C13 family");
    }
}
