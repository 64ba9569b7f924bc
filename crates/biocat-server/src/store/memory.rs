//! In-process catalog store
//!
//! Tables live in ordered maps behind one `tokio::sync::Mutex`. A transaction
//! holds the lock for its whole lifetime and works on a private copy of the
//! tables, so transactions are serialised and a dropped transaction leaves
//! no trace.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{CatalogStore, CatalogTx, NewAssignment, StoreError, StoreResult};
use crate::models::{
    AssignmentDetail, Domain, DomainAssignment, DomainWithPfam, Organism, OrganismFields, Pfam,
    Protein,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    organisms: BTreeMap<i64, Organism>,
    proteins: BTreeMap<String, Protein>,
    pfams: BTreeMap<String, Pfam>,
    domains: BTreeMap<i64, Domain>,
    assignments: BTreeMap<i64, DomainAssignment>,
    next_organism_id: i64,
    next_domain_id: i64,
    next_assignment_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn organism_key_taken(&self, key: &OrganismFields, except: Option<i64>) -> bool {
        self.organisms
            .values()
            .any(|o| Some(o.id) != except && o.matches(key))
    }

    fn remove_assignments_where(&mut self, pred: impl Fn(&DomainAssignment) -> bool) {
        self.assignments.retain(|_, a| !pred(a));
    }

    fn remove_protein(&mut self, protein_id: &str) -> bool {
        if self.proteins.remove(protein_id).is_none() {
            return false;
        }
        self.remove_assignments_where(|a| a.protein_id == protein_id);
        true
    }

    fn taxa_protein_ids(&self, taxa_id: i32) -> BTreeSet<String> {
        self.proteins
            .values()
            .filter(|p| {
                self.organisms
                    .get(&p.organism_id)
                    .is_some_and(|o| o.taxa_id == Some(taxa_id))
            })
            .map(|p| p.protein_id.clone())
            .collect()
    }
}

/// Catalog store kept entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn begin(&self) -> StoreResult<Box<dyn CatalogTx>> {
        let guard = self.tables.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTx { guard, working }))
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl CatalogTx for MemoryTx {
    async fn find_organism(&mut self, key: &OrganismFields) -> StoreResult<Option<Organism>> {
        Ok(self
            .working
            .organisms
            .values()
            .find(|o| o.matches(key))
            .cloned())
    }

    async fn get_organism(&mut self, id: i64) -> StoreResult<Option<Organism>> {
        Ok(self.working.organisms.get(&id).cloned())
    }

    async fn insert_organism(&mut self, fields: &OrganismFields) -> StoreResult<Organism> {
        if self.working.organism_key_taken(fields, None) {
            return Err(StoreError::unique("organism", organism_key(fields)));
        }
        let id = Tables::next_id(&mut self.working.next_organism_id);
        let organism = Organism {
            id,
            taxa_id: fields.taxa_id,
            clade: fields.clade.clone(),
            genus: fields.genus.clone(),
            species: fields.species.clone(),
        };
        self.working.organisms.insert(id, organism.clone());
        Ok(organism)
    }

    async fn update_organism(&mut self, id: i64, fields: &OrganismFields) -> StoreResult<Organism> {
        if !self.working.organisms.contains_key(&id) {
            return Err(StoreError::missing("organism", id.to_string()));
        }
        if self.working.organism_key_taken(fields, Some(id)) {
            return Err(StoreError::unique("organism", organism_key(fields)));
        }
        let organism = Organism {
            id,
            taxa_id: fields.taxa_id,
            clade: fields.clade.clone(),
            genus: fields.genus.clone(),
            species: fields.species.clone(),
        };
        self.working.organisms.insert(id, organism.clone());
        Ok(organism)
    }

    async fn list_organisms(&mut self) -> StoreResult<Vec<Organism>> {
        Ok(self.working.organisms.values().cloned().collect())
    }

    async fn delete_organism(&mut self, id: i64) -> StoreResult<bool> {
        if self.working.organisms.remove(&id).is_none() {
            return Ok(false);
        }
        let orphaned: Vec<String> = self
            .working
            .proteins
            .values()
            .filter(|p| p.organism_id == id)
            .map(|p| p.protein_id.clone())
            .collect();
        for protein_id in orphaned {
            self.working.remove_protein(&protein_id);
        }
        Ok(true)
    }

    async fn get_protein(&mut self, protein_id: &str) -> StoreResult<Option<Protein>> {
        Ok(self.working.proteins.get(protein_id).cloned())
    }

    async fn insert_protein(&mut self, protein: &Protein) -> StoreResult<Protein> {
        if self.working.proteins.contains_key(&protein.protein_id) {
            return Err(StoreError::unique("protein", &protein.protein_id));
        }
        if !self.working.organisms.contains_key(&protein.organism_id) {
            return Err(StoreError::missing("protein", &protein.protein_id));
        }
        self.working
            .proteins
            .insert(protein.protein_id.clone(), protein.clone());
        Ok(protein.clone())
    }

    async fn update_protein(&mut self, protein: &Protein) -> StoreResult<Protein> {
        if !self.working.organisms.contains_key(&protein.organism_id) {
            return Err(StoreError::missing("protein", &protein.protein_id));
        }
        match self.working.proteins.get_mut(&protein.protein_id) {
            Some(row) => {
                *row = protein.clone();
                Ok(protein.clone())
            },
            None => Err(StoreError::missing("protein", &protein.protein_id)),
        }
    }

    async fn delete_protein(&mut self, protein_id: &str) -> StoreResult<bool> {
        Ok(self.working.remove_protein(protein_id))
    }

    async fn list_proteins(&mut self, limit: i64, offset: i64) -> StoreResult<Vec<Protein>> {
        let skip = usize::try_from(offset).unwrap_or(0);
        let take = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .working
            .proteins
            .values()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count_proteins(&mut self) -> StoreResult<i64> {
        Ok(self.working.proteins.len() as i64)
    }

    async fn list_proteins_by_taxa(&mut self, taxa_id: i32) -> StoreResult<Vec<Protein>> {
        let ids = self.working.taxa_protein_ids(taxa_id);
        Ok(ids
            .iter()
            .filter_map(|id| self.working.proteins.get(id).cloned())
            .collect())
    }

    async fn get_pfam(&mut self, domain_id: &str) -> StoreResult<Option<Pfam>> {
        Ok(self.working.pfams.get(domain_id).cloned())
    }

    async fn insert_pfam(&mut self, pfam: &Pfam) -> StoreResult<Pfam> {
        if self.working.pfams.contains_key(&pfam.domain_id) {
            return Err(StoreError::unique("pfam", &pfam.domain_id));
        }
        self.working
            .pfams
            .insert(pfam.domain_id.clone(), pfam.clone());
        Ok(pfam.clone())
    }

    async fn first_domain_for_pfam(&mut self, pfam_id: &str) -> StoreResult<Option<Domain>> {
        Ok(self
            .working
            .domains
            .values()
            .find(|d| d.pfam_id.as_deref() == Some(pfam_id))
            .cloned())
    }

    async fn insert_domain(
        &mut self,
        domain_description: &str,
        pfam_id: Option<&str>,
    ) -> StoreResult<Domain> {
        if let Some(pfam_id) = pfam_id {
            if !self.working.pfams.contains_key(pfam_id) {
                return Err(StoreError::missing("domain", pfam_id));
            }
        }
        let id = Tables::next_id(&mut self.working.next_domain_id);
        let domain = Domain {
            id,
            domain_description: domain_description.to_string(),
            pfam_id: pfam_id.map(str::to_string),
        };
        self.working.domains.insert(id, domain.clone());
        Ok(domain)
    }

    async fn set_domain_descriptions_for_pfam(
        &mut self,
        pfam_id: &str,
        domain_description: &str,
    ) -> StoreResult<u64> {
        let mut updated = 0;
        for domain in self
            .working
            .domains
            .values_mut()
            .filter(|d| d.pfam_id.as_deref() == Some(pfam_id))
        {
            domain.domain_description = domain_description.to_string();
            updated += 1;
        }
        Ok(updated)
    }

    async fn list_domains_by_taxa(&mut self, taxa_id: i32) -> StoreResult<Vec<DomainWithPfam>> {
        let proteins = self.working.taxa_protein_ids(taxa_id);
        let domain_ids: BTreeSet<i64> = self
            .working
            .assignments
            .values()
            .filter(|a| proteins.contains(&a.protein_id))
            .map(|a| a.domain_id)
            .collect();

        Ok(domain_ids
            .into_iter()
            .filter_map(|id| self.working.domains.get(&id))
            .map(|domain| {
                let pfam = domain
                    .pfam_id
                    .as_ref()
                    .and_then(|p| self.working.pfams.get(p));
                DomainWithPfam {
                    id: domain.id,
                    pfam_id: pfam.map(|p| p.domain_id.clone()),
                    pfam_description: pfam.map(|p| p.domain_description.clone()),
                }
            })
            .collect())
    }

    async fn find_assignment(
        &mut self,
        new: &NewAssignment,
    ) -> StoreResult<Option<DomainAssignment>> {
        Ok(self
            .working
            .assignments
            .values()
            .find(|a| same_assignment(a, new))
            .cloned())
    }

    async fn insert_assignment(&mut self, new: &NewAssignment) -> StoreResult<DomainAssignment> {
        if self
            .working
            .assignments
            .values()
            .any(|a| same_assignment(a, new))
        {
            return Err(StoreError::unique("domain assignment", new.key()));
        }
        if !self.working.proteins.contains_key(&new.protein_id)
            || !self.working.domains.contains_key(&new.domain_id)
        {
            return Err(StoreError::missing("domain assignment", new.key()));
        }
        let id = Tables::next_id(&mut self.working.next_assignment_id);
        let assignment = DomainAssignment {
            id,
            protein_id: new.protein_id.clone(),
            domain_id: new.domain_id,
            start_pos: new.start_pos,
            end_pos: new.end_pos,
        };
        self.working.assignments.insert(id, assignment.clone());
        Ok(assignment)
    }

    async fn list_assignment_details(
        &mut self,
        protein_id: &str,
    ) -> StoreResult<Vec<AssignmentDetail>> {
        let mut details = Vec::new();
        for assignment in self
            .working
            .assignments
            .values()
            .filter(|a| a.protein_id == protein_id)
        {
            let Some(domain) = self.working.domains.get(&assignment.domain_id) else {
                continue;
            };
            let pfam = domain
                .pfam_id
                .as_ref()
                .and_then(|p| self.working.pfams.get(p));
            details.push(AssignmentDetail {
                id: assignment.id,
                domain_id: domain.id,
                domain_description: domain.domain_description.clone(),
                pfam_id: pfam.map(|p| p.domain_id.clone()),
                pfam_description: pfam.map(|p| p.domain_description.clone()),
                start_pos: assignment.start_pos,
                end_pos: assignment.end_pos,
            });
        }
        Ok(details)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTx { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

fn organism_key(fields: &OrganismFields) -> String {
    let taxa = fields
        .taxa_id
        .map(|t| t.to_string())
        .unwrap_or_else(|| "null".to_string());
    format!(
        "({}, {}, {}, {})",
        taxa, fields.clade, fields.genus, fields.species
    )
}

fn same_assignment(row: &DomainAssignment, new: &NewAssignment) -> bool {
    row.protein_id == new.protein_id
        && row.domain_id == new.domain_id
        && row.start_pos == new.start_pos
        && row.end_pos == new.end_pos
}
