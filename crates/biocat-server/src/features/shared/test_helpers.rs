//! Test fixtures shared by feature tests
//!
//! # Examples
//!
//! ```rust,ignore
//! use biocat_server::features::shared::test_helpers::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let store = memory_store();
//!     let command = CreateProteinCommand::new(sample_payload("P1"));
//!     // ... test logic ...
//! }
//! ```

use std::sync::Arc;

use crate::features::proteins::types::{
    DomainEntryPayload, PfamPayload, ProteinPayload, TaxonomyPayload,
};
use crate::store::{MemoryCatalogStore, SharedStore};

/// Fresh in-memory store behind the shared handle type
pub fn memory_store() -> SharedStore {
    Arc::new(MemoryCatalogStore::new())
}

/// Metarhizium robertsii, taxa 568076
pub fn sample_taxonomy() -> TaxonomyPayload {
    TaxonomyPayload {
        taxa_id: Some(Some(568076)),
        clade: Some("E".to_string()),
        genus: Some("Metarhizium".to_string()),
        species: Some("robertsii".to_string()),
    }
}

/// One PF01650 assignment over `[start, stop]`
pub fn sample_domain(start: i32, stop: i32) -> DomainEntryPayload {
    DomainEntryPayload {
        pfam_id: Some(PfamPayload {
            domain_id: Some("PF01650".to_string()),
            domain_description: Some("Peptidase C13 family".to_string()),
        }),
        description: Some("Peptidase C13 legumain".to_string()),
        start: Some(start),
        stop: Some(stop),
    }
}

/// Complete payload with one domain assignment spanning 40..=94 of 338 residues
pub fn sample_payload(protein_id: &str) -> ProteinPayload {
    ProteinPayload {
        protein_id: Some(protein_id.to_string()),
        sequence: Some("MVIGFLLLAVPVLALA".to_string()),
        length: Some(338),
        id_custom: None,
        taxonomy: Some(sample_taxonomy()),
        domains: vec![sample_domain(40, 94)],
    }
}
