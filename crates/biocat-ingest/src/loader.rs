//! Bulk loader for the catalog CSV files
//!
//! Files are applied in a fixed order: duplicate organisms are pruned, then
//! sequences, the assignment data set and finally Pfam descriptions. Every
//! row runs in its own store transaction, so a bad row is skipped without
//! losing the rows around it.

use std::path::{Path, PathBuf};

use biocat_common::CatalogError;
use biocat_server::features::organisms::{get_or_create_organism, prune_duplicate_organisms};
use biocat_server::features::proteins::assignments::{attach_domain, AttachMode};
use biocat_server::features::proteins::types::DomainEntry;
use biocat_server::models::{OrganismFields, Protein};
use biocat_server::store::{CatalogTx, SharedStore, StoreError};
use csv::StringRecord;
use tracing::{error, info, warn};

use crate::rows::{
    parse_assignment, parse_pfam_description, parse_sequence, AssignmentRow, PfamDescriptionRow,
    SequenceRow,
};

/// First `id_custom` handed out by the assignment data set
pub const FIRST_ID_CUSTOM: i32 = 80001;

pub const SEQUENCES_FILE: &str = "assignment_data_sequences.csv";
pub const ASSIGNMENT_DATA_SET_FILE: &str = "assignment_data_set.csv";
pub const PFAM_DESCRIPTIONS_FILE: &str = "pfam_descriptions.csv";

/// Organism bound to proteins known only from the sequences file
pub fn placeholder_organism() -> OrganismFields {
    OrganismFields {
        taxa_id: Some(-1),
        clade: String::new(),
        genus: "Unspecified".to_string(),
        species: "Unspecified".to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Parse(#[from] CatalogError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Locations of the three input files
#[derive(Debug, Clone)]
pub struct LoadFiles {
    pub sequences: PathBuf,
    pub assignment_data_set: PathBuf,
    pub pfam_descriptions: PathBuf,
}

impl LoadFiles {
    /// The conventional file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            sequences: dir.join(SEQUENCES_FILE),
            assignment_data_set: dir.join(ASSIGNMENT_DATA_SET_FILE),
            pfam_descriptions: dir.join(PFAM_DESCRIPTIONS_FILE),
        }
    }
}

/// Row counts for one input file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReport {
    pub loaded: u64,
    pub skipped: u64,
    /// The file could not be opened and was not read at all
    pub unreadable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub pruned_organisms: u64,
    pub sequences: FileReport,
    pub assignments: FileReport,
    pub pfam_descriptions: FileReport,
}

impl LoadReport {
    pub fn skipped(&self) -> u64 {
        self.sequences.skipped + self.assignments.skipped + self.pfam_descriptions.skipped
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Sequences,
    AssignmentDataSet,
    PfamDescriptions,
}

pub struct Loader {
    store: SharedStore,
    next_id_custom: i32,
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>, csv::Error> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
}

fn location(path: &Path, line: u64) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    format!("{}:{}", name, line)
}

impl Loader {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            next_id_custom: FIRST_ID_CUSTOM,
        }
    }

    /// Run every step against `files`
    pub async fn run(&mut self, files: &LoadFiles) -> Result<LoadReport, LoadError> {
        let mut report = LoadReport {
            pruned_organisms: self.prune_duplicates().await?,
            ..LoadReport::default()
        };

        report.sequences = self.load_sequences(&files.sequences).await;
        report.assignments = self.load_assignment_data_set(&files.assignment_data_set).await;
        report.pfam_descriptions = self.load_pfam_descriptions(&files.pfam_descriptions).await;

        info!(
            pruned_organisms = report.pruned_organisms,
            sequences = report.sequences.loaded,
            assignments = report.assignments.loaded,
            pfam_descriptions = report.pfam_descriptions.loaded,
            skipped = report.skipped(),
            "Load finished"
        );
        Ok(report)
    }

    /// Keep the first organism of each identity tuple and delete the rest
    pub async fn prune_duplicates(&self) -> Result<u64, LoadError> {
        let mut tx = self.store.begin().await?;
        let removed = prune_duplicate_organisms(tx.as_mut()).await?;
        tx.commit().await?;
        Ok(removed)
    }

    pub async fn load_sequences(&mut self, path: &Path) -> FileReport {
        self.load_file(Step::Sequences, path).await
    }

    pub async fn load_assignment_data_set(&mut self, path: &Path) -> FileReport {
        self.load_file(Step::AssignmentDataSet, path).await
    }

    pub async fn load_pfam_descriptions(&mut self, path: &Path) -> FileReport {
        self.load_file(Step::PfamDescriptions, path).await
    }

    async fn load_file(&mut self, step: Step, path: &Path) -> FileReport {
        let mut reader = match open(path) {
            Ok(reader) => reader,
            Err(e) => {
                error!(file = %path.display(), error = %e, "Cannot read input file, skipping it");
                return FileReport {
                    unreadable: true,
                    ..FileReport::default()
                };
            },
        };

        let mut report = FileReport::default();
        for (index, record) in reader.records().enumerate() {
            let at = location(path, index as u64 + 1);
            let result = match record {
                Ok(record) => self.apply(step, &record, &at).await,
                Err(e) => Err(e.into()),
            };
            match result {
                Ok(()) => report.loaded += 1,
                Err(e) => {
                    warn!(row = %at, error = %e, "Skipping row");
                    report.skipped += 1;
                },
            }
        }

        info!(
            file = %path.display(),
            step = ?step,
            loaded = report.loaded,
            skipped = report.skipped,
            "File loaded"
        );
        report
    }

    /// Apply one row inside its own transaction
    async fn apply(&mut self, step: Step, record: &StringRecord, at: &str) -> Result<(), LoadError> {
        match step {
            Step::Sequences => {
                let row = parse_sequence(record, at)?;
                let mut tx = self.store.begin().await?;
                store_sequence(tx.as_mut(), &row).await?;
                tx.commit().await?;
            },
            Step::AssignmentDataSet => {
                let row = parse_assignment(record, at)?;
                let mut tx = self.store.begin().await?;
                store_assignment(tx.as_mut(), &row, self.next_id_custom).await?;
                tx.commit().await?;
                self.next_id_custom += 1;
            },
            Step::PfamDescriptions => {
                let row = parse_pfam_description(record, at)?;
                let mut tx = self.store.begin().await?;
                store_pfam_description(tx.as_mut(), &row).await?;
                tx.commit().await?;
            },
        }
        Ok(())
    }
}

/// Set the sequence, creating the protein under the placeholder organism if unknown
async fn store_sequence(tx: &mut dyn CatalogTx, row: &SequenceRow) -> Result<(), StoreError> {
    match tx.get_protein(&row.protein_id).await? {
        Some(mut protein) => {
            protein.sequence = row.sequence.clone();
            tx.update_protein(&protein).await?;
        },
        None => {
            let (organism, _) = get_or_create_organism(tx, &placeholder_organism()).await?;
            tx.insert_protein(&Protein {
                protein_id: row.protein_id.clone(),
                sequence: row.sequence.clone(),
                length: 0,
                id_custom: None,
                organism_id: organism.id,
            })
            .await?;
        },
    }
    Ok(())
}

/// Rebind the protein to the row's organism, then attach the row's domain
async fn store_assignment(
    tx: &mut dyn CatalogTx,
    row: &AssignmentRow,
    id_custom: i32,
) -> Result<(), StoreError> {
    let (organism, _) = get_or_create_organism(tx, &row.organism).await?;

    match tx.get_protein(&row.protein_id).await? {
        Some(mut protein) => {
            protein.length = row.length;
            protein.organism_id = organism.id;
            protein.id_custom = Some(id_custom);
            tx.update_protein(&protein).await?;
        },
        None => {
            tx.insert_protein(&Protein {
                protein_id: row.protein_id.clone(),
                sequence: String::new(),
                length: row.length,
                id_custom: Some(id_custom),
                organism_id: organism.id,
            })
            .await?;
        },
    }

    let entry = DomainEntry {
        pfam: row.default_pfam(),
        description: row.description.clone(),
        start: row.start,
        end: row.end,
    };
    attach_domain(tx, &row.protein_id, &entry, AttachMode::Merge).await?;
    Ok(())
}

async fn store_pfam_description(
    tx: &mut dyn CatalogTx,
    row: &PfamDescriptionRow,
) -> Result<(), StoreError> {
    let updated = tx
        .set_domain_descriptions_for_pfam(&row.pfam_id, &row.description)
        .await?;
    if updated == 0 {
        tracing::debug!(pfam_id = %row.pfam_id, "No domains classified by this Pfam family");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use biocat_server::store::{CatalogStore, MemoryCatalogStore};
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        std::fs::write(dir.path().join(name), contents).unwrap();
    }

    fn memory_store() -> Arc<MemoryCatalogStore> {
        Arc::new(MemoryCatalogStore::new())
    }

    const DATA_SET: &str = "\
A0A014PQC0,568076,E,Metarhizium robertsii ARSEF 23,Peptidase C13 legumain,PF01650,40,94,338
A0A014PQC0,568076,E,Metarhizium robertsii ARSEF 23,Peptidase C13 legumain,PF01650,40,94,338
A0A1B8Y3T7,568076,E,Metarhizium robertsii,Ubiquitin family,PF00240,3,75,120
";

    #[tokio::test]
    async fn test_full_load() {
        let dir = TempDir::new().unwrap();
        write(&dir, SEQUENCES_FILE, "A0A014PQC0,MVIGFLLLAV\nORPHAN1,MKV\n");
        write(&dir, ASSIGNMENT_DATA_SET_FILE, DATA_SET);
        write(&dir, PFAM_DESCRIPTIONS_FILE, "PF01650,Peptidase C13 family\n");

        let store = memory_store();
        let mut loader = Loader::new(store.clone());
        let report = loader.run(&LoadFiles::in_dir(dir.path())).await.unwrap();

        assert_eq!(report.sequences.loaded, 2);
        assert_eq!(report.assignments.loaded, 3);
        assert_eq!(report.pfam_descriptions.loaded, 1);
        assert_eq!(report.skipped(), 0);

        let mut tx = store.begin().await.unwrap();
        let protein = tx.get_protein("A0A014PQC0").await.unwrap().unwrap();
        assert_eq!(protein.sequence, "MVIGFLLLAV");
        assert_eq!(protein.length, 338);
        // The repeated row re-assigned the custom id
        assert_eq!(protein.id_custom, Some(FIRST_ID_CUSTOM + 1));

        let organism = tx.get_organism(protein.organism_id).await.unwrap().unwrap();
        assert_eq!(organism.genus, "Metarhizium");
        assert_eq!(organism.species, "robertsii");

        let details = tx.list_assignment_details("A0A014PQC0").await.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].domain_description, "Peptidase C13 family");

        let orphan = tx.get_protein("ORPHAN1").await.unwrap().unwrap();
        let placeholder = tx.get_organism(orphan.organism_id).await.unwrap().unwrap();
        assert_eq!(placeholder.taxa_id, Some(-1));
        assert_eq!(placeholder.genus, "Unspecified");
    }

    #[tokio::test]
    async fn test_bad_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            ASSIGNMENT_DATA_SET_FILE,
            "P1,notanumber,E,Homo sapiens,d,PF1,1,2,3\nP2,9606,E,Homo sapiens,d,PF1,1,2,3\nP3,9606\n",
        );

        let store = memory_store();
        let mut loader = Loader::new(store.clone());
        let report = loader
            .load_assignment_data_set(&dir.path().join(ASSIGNMENT_DATA_SET_FILE))
            .await;

        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped, 2);

        let mut tx = store.begin().await.unwrap();
        assert!(tx.get_protein("P1").await.unwrap().is_none());
        let p2 = tx.get_protein("P2").await.unwrap().unwrap();
        assert_eq!(p2.id_custom, Some(FIRST_ID_CUSTOM));
    }

    #[tokio::test]
    async fn test_missing_file_does_not_stop_the_load() {
        let dir = TempDir::new().unwrap();
        write(&dir, ASSIGNMENT_DATA_SET_FILE, DATA_SET);

        let mut loader = Loader::new(memory_store());
        let report = loader.run(&LoadFiles::in_dir(dir.path())).await.unwrap();

        assert!(report.sequences.unreadable);
        assert!(report.pfam_descriptions.unreadable);
        assert!(!report.assignments.unreadable);
        assert_eq!(report.assignments.loaded, 3);
    }

    #[tokio::test]
    async fn test_prune_keeps_distinct_organisms() {
        let store = memory_store();
        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_organism(&placeholder_organism()).await.unwrap();
            tx.commit().await.unwrap();
        }

        let loader = Loader::new(store.clone());
        assert_eq!(loader.prune_duplicates().await.unwrap(), 0);

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.list_organisms().await.unwrap().len(), 1);
    }
}
