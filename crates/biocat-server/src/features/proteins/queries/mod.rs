pub mod coverage;
pub mod get;
pub mod list;
pub mod list_by_taxa;

pub use coverage::{CoverageError, CoverageQuery, CoverageResponse};
pub use get::{GetProteinError, GetProteinQuery};
pub use list::{ListProteinsError, ListProteinsQuery};
pub use list_by_taxa::{ListProteinsByTaxaError, ListProteinsByTaxaQuery, ProteinByTaxaItem};
