//! Wire types for the protein aggregate
//!
//! [`ProteinPayload`] is what clients send: every field optional so that
//! validation can report all missing fields at once. [`ProteinInput`] is the
//! validated form the commands work with. [`ProteinAggregate`] is what the
//! API returns.

use serde::{Deserialize, Deserializer, Serialize};

use crate::features::shared::validation::{indexed, FieldChecks, InvalidFields};
use crate::models::{
    AssignmentDetail, Organism, OrganismFields, Pfam, ACCESSION_MAX_LEN, DESCRIPTION_MAX_LEN,
    TAXON_NAME_MAX_LEN,
};
use crate::store::{CatalogTx, StoreError, StoreResult};

/// Distinguishes an absent key (`None`) from an explicit `null` (`Some(None)`)
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyPayload {
    /// Required key; `null` is a valid value
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub taxa_id: Option<Option<i32>>,
    pub clade: Option<String>,
    pub genus: Option<String>,
    pub species: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PfamPayload {
    pub domain_id: Option<String>,
    pub domain_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainEntryPayload {
    pub pfam_id: Option<PfamPayload>,
    pub description: Option<String>,
    pub start: Option<i32>,
    #[serde(alias = "end")]
    pub stop: Option<i32>,
}

/// Protein aggregate as submitted for create or update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProteinPayload {
    pub protein_id: Option<String>,
    pub sequence: Option<String>,
    pub length: Option<i32>,
    pub id_custom: Option<i32>,
    #[serde(alias = "organism")]
    pub taxonomy: Option<TaxonomyPayload>,
    #[serde(default)]
    pub domains: Vec<DomainEntryPayload>,
}

/// One validated domain-assignment entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub pfam: Pfam,
    pub description: String,
    pub start: i32,
    pub end: i32,
}

/// Validated protein aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinInput {
    pub protein_id: String,
    pub sequence: String,
    pub length: i32,
    pub id_custom: Option<i32>,
    pub organism: OrganismFields,
    pub domains: Vec<DomainEntry>,
}

impl ProteinPayload {
    /// Check every field, returning the dotted paths of those missing or too long
    pub fn into_input(self) -> Result<ProteinInput, InvalidFields> {
        let mut checks = FieldChecks::new();

        let protein_id = checks.require_text_max("protein_id", self.protein_id, ACCESSION_MAX_LEN);
        let sequence = checks.require_text("sequence", self.sequence);

        let organism = match checks.require("taxonomy", self.taxonomy) {
            Some(taxonomy) => {
                let taxa_id = checks.require("taxonomy.taxa_id", taxonomy.taxa_id);
                let clade =
                    checks.require_text_max("taxonomy.clade", taxonomy.clade, TAXON_NAME_MAX_LEN);
                let genus =
                    checks.require_text_max("taxonomy.genus", taxonomy.genus, TAXON_NAME_MAX_LEN);
                let species = checks.require_text_max(
                    "taxonomy.species",
                    taxonomy.species,
                    TAXON_NAME_MAX_LEN,
                );
                match (taxa_id, clade, genus, species) {
                    (Some(taxa_id), Some(clade), Some(genus), Some(species)) => {
                        Some(OrganismFields {
                            taxa_id,
                            clade,
                            genus,
                            species,
                        })
                    },
                    _ => None,
                }
            },
            None => None,
        };

        let mut domains = Vec::with_capacity(self.domains.len());
        for (index, entry) in self.domains.into_iter().enumerate() {
            let pfam = match checks.require(indexed("domains", index, "pfam_id"), entry.pfam_id) {
                Some(pfam) => {
                    let domain_id = checks.require_text_max(
                        indexed("domains", index, "pfam_id.domain_id"),
                        pfam.domain_id,
                        ACCESSION_MAX_LEN,
                    );
                    let domain_description = checks.require_text_max(
                        indexed("domains", index, "pfam_id.domain_description"),
                        pfam.domain_description,
                        DESCRIPTION_MAX_LEN,
                    );
                    domain_id.zip(domain_description).map(|(domain_id, domain_description)| {
                        Pfam {
                            domain_id,
                            domain_description,
                        }
                    })
                },
                None => None,
            };
            let description = checks.require_text_max(
                indexed("domains", index, "description"),
                entry.description,
                DESCRIPTION_MAX_LEN,
            );
            let start = checks.require(indexed("domains", index, "start"), entry.start);
            let end = checks.require(indexed("domains", index, "stop"), entry.stop);

            if let (Some(pfam), Some(description), Some(start), Some(end)) =
                (pfam, description, start, end)
            {
                domains.push(DomainEntry {
                    pfam,
                    description,
                    start,
                    end,
                });
            }
        }

        match (protein_id, sequence, organism) {
            (Some(protein_id), Some(sequence), Some(organism)) if checks.is_empty() => {
                Ok(ProteinInput {
                    protein_id,
                    sequence,
                    length: self.length.unwrap_or(0),
                    id_custom: self.id_custom,
                    organism,
                    domains,
                })
            },
            _ => Err(checks.into_errors()),
        }
    }
}

/// One domain assignment as returned inside a [`ProteinAggregate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainView {
    pub pfam_id: Option<Pfam>,
    /// The Pfam family description, or the domain's own when unclassified
    pub description: String,
    pub start: i32,
    pub stop: i32,
}

impl From<AssignmentDetail> for DomainView {
    fn from(detail: AssignmentDetail) -> Self {
        let pfam_id = match (detail.pfam_id, detail.pfam_description.clone()) {
            (Some(domain_id), Some(domain_description)) => Some(Pfam {
                domain_id,
                domain_description,
            }),
            _ => None,
        };
        Self {
            pfam_id,
            description: detail
                .pfam_description
                .unwrap_or(detail.domain_description),
            start: detail.start_pos,
            stop: detail.end_pos,
        }
    }
}

/// Protein with its organism and domain assignments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinAggregate {
    pub protein_id: String,
    pub sequence: String,
    pub taxonomy: Organism,
    pub length: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_custom: Option<i32>,
    pub domains: Vec<DomainView>,
}

/// Read the aggregate rooted at `protein_id` inside `tx`
pub async fn load_aggregate(
    tx: &mut dyn CatalogTx,
    protein_id: &str,
) -> StoreResult<Option<ProteinAggregate>> {
    let Some(protein) = tx.get_protein(protein_id).await? else {
        return Ok(None);
    };
    let taxonomy = tx
        .get_organism(protein.organism_id)
        .await?
        .ok_or_else(|| StoreError::missing("protein", &protein.protein_id))?;
    let domains = tx
        .list_assignment_details(&protein.protein_id)
        .await?
        .into_iter()
        .map(DomainView::from)
        .collect();

    Ok(Some(ProteinAggregate {
        protein_id: protein.protein_id,
        sequence: protein.sequence,
        taxonomy,
        length: protein.length,
        id_custom: protein.id_custom,
        domains,
    }))
}
