//! Marker traits separating writes from reads
//!
//! Commands change catalog state and commit their transaction; queries only
//! read and let theirs roll back on drop.

/// A request that writes to the catalog
pub trait Command {}

/// A request that only reads from the catalog
pub trait Query {}
