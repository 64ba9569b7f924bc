//! Attaching domain-assignment entries to a protein

use super::types::DomainEntry;
use crate::features::pfams::{get_or_create_domain, get_or_create_pfam};
use crate::models::DomainAssignment;
use crate::store::{CatalogTx, NewAssignment, StoreResult};

/// How an entry that matches an existing assignment is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachMode {
    /// Always insert; a duplicate assignment is a unique violation
    Insert,
    /// Reuse the existing assignment with the same protein, domain and interval
    Merge,
}

/// Resolve the entry's Pfam family and domain, then record the assignment
pub async fn attach_domain(
    tx: &mut dyn CatalogTx,
    protein_id: &str,
    entry: &DomainEntry,
    mode: AttachMode,
) -> StoreResult<DomainAssignment> {
    let (pfam, _) = get_or_create_pfam(tx, &entry.pfam).await?;
    let (domain, _) = get_or_create_domain(tx, &pfam.domain_id, &entry.description).await?;

    let new = NewAssignment {
        protein_id: protein_id.to_string(),
        domain_id: domain.id,
        start_pos: entry.start,
        end_pos: entry.end,
    };

    if mode == AttachMode::Merge {
        if let Some(existing) = tx.find_assignment(&new).await? {
            return Ok(existing);
        }
    }
    tx.insert_assignment(&new).await
}
