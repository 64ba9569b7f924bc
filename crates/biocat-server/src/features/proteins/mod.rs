//! Protein aggregates: nested create/update, reads and domain coverage

pub mod assignments;
pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CreateProteinCommand, CreateProteinError, DeleteProteinCommand, DeleteProteinError,
    UpdateProteinCommand, UpdateProteinError,
};
pub use queries::{
    CoverageError, CoverageQuery, CoverageResponse, GetProteinError, GetProteinQuery,
    ListProteinsByTaxaError, ListProteinsByTaxaQuery, ListProteinsError, ListProteinsQuery,
    ProteinByTaxaItem,
};
pub use routes::proteins_routes;
pub use types::{ProteinAggregate, ProteinInput, ProteinPayload};
