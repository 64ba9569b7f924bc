//! Shared utilities and types for feature modules
//!
//! # Contents
//!
//! - **pagination**: Limit/offset pagination types
//! - **validation**: Missing and over-long field collection for loose payloads
//! - **error_helpers**: Database error handling utilities
//! - **test_helpers**: Test fixtures and utilities (test-only)

pub mod error_helpers;
pub mod pagination;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used types
pub use pagination::{Paginated, PaginationParams};
pub use validation::{FieldChecks, InvalidFields};
