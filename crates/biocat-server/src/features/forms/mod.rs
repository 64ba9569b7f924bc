//! HTML entry form for creating a protein by hand

pub mod page;
pub mod routes;

pub use routes::forms_routes;
