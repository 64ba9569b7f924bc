//! Shared validation utilities
//!
//! Payloads arrive with every field optional so that all problems can be
//! reported at once. [`FieldChecks`] collects the dotted path of each absent
//! or over-long field while the payload is converted into its validated form.
//!
//! # Examples
//!
//! ```rust,ignore
//! let mut checks = FieldChecks::new();
//! let genus = checks.require_text_max("taxonomy.genus", payload.genus, TAXON_NAME_MAX_LEN);
//! let length = checks.require("length", payload.length);
//! if !checks.is_empty() {
//!     return Err(checks.into_errors());
//! }
//! ```

use std::fmt;

/// Every field a payload got wrong, by dotted path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidFields {
    /// Required fields that were absent, `null` or blank
    pub missing: Vec<String>,
    /// Text fields longer than their column allows
    pub too_long: Vec<String>,
}

impl InvalidFields {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.too_long.is_empty()
    }
}

impl fmt::Display for InvalidFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(2);
        if !self.missing.is_empty() {
            parts.push(format!("Missing required fields: {}", self.missing.join(", ")));
        }
        if !self.too_long.is_empty() {
            parts.push(format!("Fields too long: {}", self.too_long.join(", ")));
        }
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for InvalidFields {}

/// Accumulates field problems in the order the fields are checked
#[derive(Debug, Default)]
pub struct FieldChecks {
    errors: InvalidFields,
}

impl FieldChecks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` as missing when `value` is absent
    pub fn require<T>(&mut self, path: impl Into<String>, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.errors.missing.push(path.into());
        }
        value
    }

    /// Required text; blank counts as missing
    pub fn require_text(&mut self, path: impl Into<String>, value: Option<String>) -> Option<String> {
        self.require(path, value.filter(|v| !v.trim().is_empty()))
    }

    /// Required text of at most `max_len` characters
    pub fn require_text_max(
        &mut self,
        path: impl Into<String>,
        value: Option<String>,
        max_len: usize,
    ) -> Option<String> {
        let path = path.into();
        match self.require_text(path.clone(), value) {
            Some(text) if text.chars().count() > max_len => {
                self.errors.too_long.push(path);
                None
            },
            other => other,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> InvalidFields {
        self.errors
    }
}

/// Path of a field inside the `index`th element of a list
pub fn indexed(list: &str, index: usize, field: &str) -> String {
    format!("{}[{}].{}", list, index, field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_paths_in_order() {
        let mut checks = FieldChecks::new();
        assert_eq!(checks.require("length", Some(3)), Some(3));
        assert_eq!(checks.require::<i32>("taxonomy.genus", None), None);
        assert_eq!(checks.require::<i32>("taxonomy.species", None), None);
        assert_eq!(
            checks.into_errors().missing,
            vec!["taxonomy.genus", "taxonomy.species"]
        );
    }

    #[test]
    fn test_blank_text_is_missing() {
        let mut checks = FieldChecks::new();
        assert_eq!(checks.require_text("protein_id", Some("  ".to_string())), None);
        assert_eq!(checks.into_errors().missing, vec!["protein_id"]);
    }

    #[test]
    fn test_long_text_is_reported_separately() {
        let mut checks = FieldChecks::new();
        assert_eq!(checks.require_text_max("protein_id", Some("P".repeat(51)), 50), None);
        assert_eq!(
            checks.require_text_max("taxonomy.genus", Some("é".repeat(50)), 50),
            Some("é".repeat(50))
        );
        let errors = checks.into_errors();
        assert!(errors.missing.is_empty());
        assert_eq!(errors.too_long, vec!["protein_id"]);
        assert_eq!(errors.to_string(), "Fields too long: protein_id");
    }

    #[test]
    fn test_empty_when_complete() {
        let mut checks = FieldChecks::new();
        checks.require_text_max("protein_id", Some("P1".to_string()), 50);
        assert!(checks.is_empty());
    }

    #[test]
    fn test_display_joins_both_kinds() {
        let errors = InvalidFields {
            missing: vec!["sequence".to_string()],
            too_long: vec!["taxonomy.clade".to_string()],
        };
        assert_eq!(
            errors.to_string(),
            "Missing required fields: sequence; Fields too long: taxonomy.clade"
        );
    }

    #[test]
    fn test_indexed_path() {
        assert_eq!(indexed("domains", 1, "pfam_id.domain_id"), "domains[1].pfam_id.domain_id");
    }
}
