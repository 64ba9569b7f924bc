pub mod get;
pub mod list_by_taxa;

pub use get::{GetPfamError, GetPfamQuery};
pub use list_by_taxa::{DomainByTaxaItem, ListPfamsByTaxaError, ListPfamsByTaxaQuery};
