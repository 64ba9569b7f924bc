//! Catalog entities
//!
//! Row types shared by every store backend. Surrogate keys are `i64`
//! (`BIGSERIAL` in Postgres); proteins and Pfam families are keyed by their
//! caller-supplied accessions.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Longest `protein_id` or Pfam `domain_id` a column holds
pub const ACCESSION_MAX_LEN: usize = 50;

/// Longest `clade`, `genus` or `species`
pub const TAXON_NAME_MAX_LEN: usize = 100;

/// Longest Pfam or domain description
pub const DESCRIPTION_MAX_LEN: usize = 200;

/// Natural key of an organism: `(taxa_id, clade, genus, species)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganismFields {
    pub taxa_id: Option<i32>,
    pub clade: String,
    pub genus: String,
    pub species: String,
}

/// Source organism of one or more proteins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Organism {
    pub id: i64,
    pub taxa_id: Option<i32>,
    pub clade: String,
    pub genus: String,
    pub species: String,
}

impl Organism {
    pub fn fields(&self) -> OrganismFields {
        OrganismFields {
            taxa_id: self.taxa_id,
            clade: self.clade.clone(),
            genus: self.genus.clone(),
            species: self.species.clone(),
        }
    }

    pub fn matches(&self, key: &OrganismFields) -> bool {
        self.taxa_id == key.taxa_id
            && self.clade == key.clade
            && self.genus == key.genus
            && self.species == key.species
    }
}

/// Protein row; `length` is declared by the caller, never derived from `sequence`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Protein {
    pub protein_id: String,
    pub sequence: String,
    pub length: i32,
    pub id_custom: Option<i32>,
    pub organism_id: i64,
}

/// Pfam family definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Pfam {
    pub domain_id: String,
    pub domain_description: String,
}

/// Domain, optionally classified by a Pfam family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Domain {
    pub id: i64,
    pub domain_description: String,
    pub pfam_id: Option<String>,
}

/// Occurrence of a domain on a protein over the closed interval `[start_pos, end_pos]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DomainAssignment {
    pub id: i64,
    pub protein_id: String,
    pub domain_id: i64,
    pub start_pos: i32,
    pub end_pos: i32,
}

/// Assignment joined with its domain and Pfam family, as read back for an aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AssignmentDetail {
    pub id: i64,
    pub domain_id: i64,
    pub domain_description: String,
    pub pfam_id: Option<String>,
    pub pfam_description: Option<String>,
    pub start_pos: i32,
    pub end_pos: i32,
}

impl AssignmentDetail {
    /// Number of residues covered, counting both ends
    pub fn span(&self) -> i64 {
        i64::from(self.end_pos) - i64::from(self.start_pos) + 1
    }
}

/// Distinct domain found on proteins of a taxon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DomainWithPfam {
    pub id: i64,
    pub pfam_id: Option<String>,
    pub pfam_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn human() -> Organism {
        Organism {
            id: 1,
            taxa_id: Some(9606),
            clade: "E".to_string(),
            genus: "Homo".to_string(),
            species: "sapiens".to_string(),
        }
    }

    #[test]
    fn test_organism_matches_own_fields() {
        let organism = human();
        assert!(organism.matches(&organism.fields()));
    }

    #[test]
    fn test_organism_key_includes_taxa_id() {
        let organism = human();
        let mut key = organism.fields();
        key.taxa_id = None;
        assert!(!organism.matches(&key));
    }

    #[test]
    fn test_assignment_span_is_inclusive() {
        let detail = AssignmentDetail {
            id: 1,
            domain_id: 1,
            domain_description: "d".to_string(),
            pfam_id: None,
            pfam_description: None,
            start_pos: 1,
            end_pos: 18,
        };
        assert_eq!(detail.span(), 18);
    }
}
