//! Organism resolution shared by protein writes and the bulk loader

pub mod get_or_create;

pub use get_or_create::{get_or_create_organism, prune_duplicate_organisms};
