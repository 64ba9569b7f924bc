//! Pfam families and the domains they classify

pub mod get_or_create;
pub mod queries;
pub mod routes;

pub use get_or_create::{get_or_create_domain, get_or_create_pfam};
pub use queries::{
    DomainByTaxaItem, GetPfamError, GetPfamQuery, ListPfamsByTaxaError, ListPfamsByTaxaQuery,
};
pub use routes::pfams_routes;
