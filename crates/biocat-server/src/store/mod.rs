//! Persistence collaborator
//!
//! Every catalog operation runs inside one [`CatalogTx`] obtained from a
//! [`CatalogStore`]. Writes become visible only on [`CatalogTx::commit`];
//! dropping a transaction discards everything it wrote. Unique constraints
//! are enforced by the backend and reported as [`StoreError::UniqueViolation`],
//! which is the authority on "already exists" for get-or-create callers.
//!
//! Two backends are provided:
//!
//! - [`PgCatalogStore`]: PostgreSQL through `sqlx`, schema in `migrations/`
//! - [`MemoryCatalogStore`]: in-process tables behind a mutex, same constraint
//!   and cascade semantics, used by tests and local demos

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::models::{
    AssignmentDetail, Domain, DomainAssignment, DomainWithPfam, Organism, OrganismFields, Pfam,
    Protein,
};

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;

/// Shared handle passed to feature handlers
pub type SharedStore = Arc<dyn CatalogStore>;

/// Store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// A natural-key or primary-key constraint rejected the write
    #[error("{entity} {key} already exists")]
    UniqueViolation { entity: &'static str, key: String },

    /// A referenced row does not exist
    #[error("{entity} {key} references a missing row")]
    MissingReference { entity: &'static str, key: String },

    /// Backend failure
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    pub fn unique(entity: &'static str, key: impl Into<String>) -> Self {
        Self::UniqueViolation {
            entity,
            key: key.into(),
        }
    }

    pub fn missing(entity: &'static str, key: impl Into<String>) -> Self {
        Self::MissingReference {
            entity,
            key: key.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Insert payload for a domain assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub protein_id: String,
    pub domain_id: i64,
    pub start_pos: i32,
    pub end_pos: i32,
}

impl NewAssignment {
    pub fn key(&self) -> String {
        format!(
            "({}, {}, {}, {})",
            self.protein_id, self.domain_id, self.start_pos, self.end_pos
        )
    }
}

/// Factory for transactions
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Open a transaction; all reads inside it observe its own prior writes
    async fn begin(&self) -> StoreResult<Box<dyn CatalogTx>>;

    /// Cheap liveness check
    async fn health_check(&self) -> StoreResult<()>;
}

/// Table operations available inside one transaction
#[async_trait]
pub trait CatalogTx: Send {
    // Organisms
    async fn find_organism(&mut self, key: &OrganismFields) -> StoreResult<Option<Organism>>;
    async fn get_organism(&mut self, id: i64) -> StoreResult<Option<Organism>>;
    async fn insert_organism(&mut self, fields: &OrganismFields) -> StoreResult<Organism>;
    async fn update_organism(&mut self, id: i64, fields: &OrganismFields) -> StoreResult<Organism>;
    /// Ordered by id
    async fn list_organisms(&mut self) -> StoreResult<Vec<Organism>>;
    /// Cascades to the organism's proteins; returns whether a row was removed
    async fn delete_organism(&mut self, id: i64) -> StoreResult<bool>;

    // Proteins
    async fn get_protein(&mut self, protein_id: &str) -> StoreResult<Option<Protein>>;
    async fn insert_protein(&mut self, protein: &Protein) -> StoreResult<Protein>;
    async fn update_protein(&mut self, protein: &Protein) -> StoreResult<Protein>;
    /// Cascades to the protein's assignments; returns whether a row was removed
    async fn delete_protein(&mut self, protein_id: &str) -> StoreResult<bool>;
    /// Ordered by `protein_id`
    async fn list_proteins(&mut self, limit: i64, offset: i64) -> StoreResult<Vec<Protein>>;
    async fn count_proteins(&mut self) -> StoreResult<i64>;
    async fn list_proteins_by_taxa(&mut self, taxa_id: i32) -> StoreResult<Vec<Protein>>;

    // Pfam families
    async fn get_pfam(&mut self, domain_id: &str) -> StoreResult<Option<Pfam>>;
    async fn insert_pfam(&mut self, pfam: &Pfam) -> StoreResult<Pfam>;

    // Domains
    /// Lowest-id domain classified by `pfam_id`
    async fn first_domain_for_pfam(&mut self, pfam_id: &str) -> StoreResult<Option<Domain>>;
    async fn insert_domain(
        &mut self,
        domain_description: &str,
        pfam_id: Option<&str>,
    ) -> StoreResult<Domain>;
    /// Returns the number of domains updated
    async fn set_domain_descriptions_for_pfam(
        &mut self,
        pfam_id: &str,
        domain_description: &str,
    ) -> StoreResult<u64>;
    /// Distinct domains assigned to proteins whose organism has `taxa_id`, ordered by id
    async fn list_domains_by_taxa(&mut self, taxa_id: i32) -> StoreResult<Vec<DomainWithPfam>>;

    // Domain assignments
    async fn find_assignment(&mut self, new: &NewAssignment)
        -> StoreResult<Option<DomainAssignment>>;
    async fn insert_assignment(&mut self, new: &NewAssignment) -> StoreResult<DomainAssignment>;
    /// Assignments of one protein joined with domain and Pfam, ordered by id
    async fn list_assignment_details(
        &mut self,
        protein_id: &str,
    ) -> StoreResult<Vec<AssignmentDetail>>;

    /// Make every write of this transaction durable
    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
