//! Typed rows of the three loader CSV files
//!
//! None of the files carry a header line. Each parser takes the raw record
//! and a `location` (`file:line`) used in parse errors.

use biocat_common::{CatalogError, Result};
use biocat_server::models::{
    OrganismFields, Pfam, ACCESSION_MAX_LEN, DESCRIPTION_MAX_LEN, TAXON_NAME_MAX_LEN,
};
use csv::StringRecord;

/// `protein_id,sequence`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRow {
    pub protein_id: String,
    pub sequence: String,
}

/// `protein_id,taxa_id,clade,"Genus species",description,pfam_id,start,end,length`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRow {
    pub protein_id: String,
    pub organism: OrganismFields,
    pub description: String,
    pub pfam_id: String,
    pub start: i32,
    pub end: i32,
    pub length: i32,
}

impl AssignmentRow {
    /// Pfam family created when the row names an unknown one
    pub fn default_pfam(&self) -> Pfam {
        Pfam {
            domain_id: self.pfam_id.clone(),
            domain_description: self.description.clone(),
        }
    }
}

/// `pfam_id,description`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PfamDescriptionRow {
    pub pfam_id: String,
    pub description: String,
}

fn expect_columns(record: &StringRecord, expected: usize, location: &str) -> Result<()> {
    if record.len() != expected {
        return Err(CatalogError::parse(
            location,
            format!("expected {} columns, found {}", expected, record.len()),
        ));
    }
    Ok(())
}

fn column<'r>(record: &'r StringRecord, index: usize) -> &'r str {
    record.get(index).map(str::trim).unwrap_or_default()
}

fn required<'r>(record: &'r StringRecord, index: usize, name: &str, location: &str) -> Result<&'r str> {
    let value = column(record, index);
    if value.is_empty() {
        return Err(CatalogError::parse(location, format!("{} is empty", name)));
    }
    Ok(value)
}

/// `value` unchanged when it fits in `max_len` characters
fn within<'v>(value: &'v str, max_len: usize, name: &str, location: &str) -> Result<&'v str> {
    if value.chars().count() > max_len {
        return Err(CatalogError::parse(
            location,
            format!("{} is longer than {} characters", name, max_len),
        ));
    }
    Ok(value)
}

fn integer(record: &StringRecord, index: usize, name: &str, location: &str) -> Result<i32> {
    let value = column(record, index);
    value.parse().map_err(|_| {
        CatalogError::parse(location, format!("{} is not an integer: {:?}", name, value))
    })
}

/// Split `"Genus species ..."` into its first two words
fn genus_species(value: &str, location: &str) -> Result<(String, String)> {
    let mut words = value.split_whitespace();
    match (words.next(), words.next()) {
        (Some(genus), Some(species)) => Ok((genus.to_string(), species.to_string())),
        _ => Err(CatalogError::parse(
            location,
            format!("expected \"Genus species\", found {:?}", value),
        )),
    }
}

pub fn parse_sequence(record: &StringRecord, location: &str) -> Result<SequenceRow> {
    expect_columns(record, 2, location)?;
    Ok(SequenceRow {
        protein_id: within(
            required(record, 0, "protein_id", location)?,
            ACCESSION_MAX_LEN,
            "protein_id",
            location,
        )?
        .to_string(),
        sequence: column(record, 1).to_string(),
    })
}

pub fn parse_assignment(record: &StringRecord, location: &str) -> Result<AssignmentRow> {
    expect_columns(record, 9, location)?;
    let (genus, species) = genus_species(column(record, 3), location)?;
    let protein_id = required(record, 0, "protein_id", location)?;
    let pfam_id = required(record, 5, "pfam_id", location)?;
    Ok(AssignmentRow {
        protein_id: within(protein_id, ACCESSION_MAX_LEN, "protein_id", location)?.to_string(),
        organism: OrganismFields {
            taxa_id: Some(integer(record, 1, "taxa_id", location)?),
            clade: within(column(record, 2), TAXON_NAME_MAX_LEN, "clade", location)?.to_string(),
            genus: within(&genus, TAXON_NAME_MAX_LEN, "genus", location)?.to_string(),
            species: within(&species, TAXON_NAME_MAX_LEN, "species", location)?.to_string(),
        },
        description: within(column(record, 4), DESCRIPTION_MAX_LEN, "description", location)?
            .to_string(),
        pfam_id: within(pfam_id, ACCESSION_MAX_LEN, "pfam_id", location)?.to_string(),
        start: integer(record, 6, "start", location)?,
        end: integer(record, 7, "end", location)?,
        length: integer(record, 8, "length", location)?,
    })
}

pub fn parse_pfam_description(record: &StringRecord, location: &str) -> Result<PfamDescriptionRow> {
    expect_columns(record, 2, location)?;
    let pfam_id = required(record, 0, "pfam_id", location)?;
    Ok(PfamDescriptionRow {
        pfam_id: within(pfam_id, ACCESSION_MAX_LEN, "pfam_id", location)?.to_string(),
        description: within(column(record, 1), DESCRIPTION_MAX_LEN, "description", location)?
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_parse_assignment_row() {
        let row = parse_assignment(
            &record(&[
                "A0A014PQC0",
                "568076",
                "E",
                "Metarhizium robertsii ARSEF 23",
                "Peptidase C13 legumain",
                "PF01650",
                "40",
                "94",
                "338",
            ]),
            "data.csv:1",
        )
        .unwrap();

        assert_eq!(row.protein_id, "A0A014PQC0");
        assert_eq!(row.organism.taxa_id, Some(568076));
        assert_eq!(row.organism.genus, "Metarhizium");
        assert_eq!(row.organism.species, "robertsii");
        assert_eq!((row.start, row.end, row.length), (40, 94, 338));
        assert_eq!(row.default_pfam().domain_description, "Peptidase C13 legumain");
    }

    #[test]
    fn test_single_word_organism_is_rejected() {
        let err = parse_assignment(
            &record(&["P1", "1", "E", "Metarhizium", "d", "PF1", "1", "2", "3"]),
            "data.csv:7",
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Parse error at data.csv:7"));
    }

    #[test]
    fn test_non_integer_start_is_rejected() {
        let err = parse_assignment(
            &record(&["P1", "1", "E", "Homo sapiens", "d", "PF1", "one", "2", "3"]),
            "data.csv:2",
        )
        .unwrap_err();
        assert!(err.to_string().contains("start is not an integer"));
    }

    #[test]
    fn test_wrong_column_count() {
        let err = parse_sequence(&record(&["P1"]), "seq.csv:1").unwrap_err();
        assert!(err.to_string().contains("expected 2 columns, found 1"));
    }

    #[test]
    fn test_blank_protein_id_is_rejected() {
        assert!(parse_sequence(&record(&["  ", "MKV"]), "seq.csv:1").is_err());
    }

    #[test]
    fn test_over_long_columns_are_rejected() {
        let long_id = "P".repeat(ACCESSION_MAX_LEN + 1);
        let err = parse_sequence(&record(&[long_id.as_str(), "MKV"]), "seq.csv:3").unwrap_err();
        assert!(err.to_string().contains("protein_id is longer than 50 characters"));

        let long_description = "d".repeat(DESCRIPTION_MAX_LEN + 1);
        let err = parse_assignment(
            &record(&["P1", "1", "E", "Homo sapiens", long_description.as_str(), "PF1", "1", "2", "3"]),
            "data.csv:4",
        )
        .unwrap_err();
        assert!(err.to_string().contains("description is longer than 200 characters"));
    }

    #[test]
    fn test_parse_pfam_description() {
        let row = parse_pfam_description(&record(&["PF01650", "Peptidase C13 family"]), "p.csv:1")
            .unwrap();
        assert_eq!(row.pfam_id, "PF01650");
        assert_eq!(row.description, "Peptidase C13 family");
    }
}
