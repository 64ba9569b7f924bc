//! Database error handling utilities
//!
//! Maps constraint violations reported by Postgres onto [`StoreError`] so
//! callers see the same errors from every store backend.
//!
//! # Examples
//!
//! ```rust,ignore
//! use biocat_server::features::shared::error_helpers::map_constraint_violation;
//!
//! sqlx::query("INSERT INTO pfams (domain_id, domain_description) VALUES ($1, $2)")
//!     .execute(&mut *tx)
//!     .await
//!     .map_err(|e| map_constraint_violation(e, "pfam", &pfam.domain_id))?;
//! ```

use sqlx::Error as SqlxError;

use crate::store::StoreError;

/// Result of checking for a database constraint violation
#[derive(Debug)]
pub enum ConstraintViolation {
    /// A unique constraint was violated
    UniqueViolation,
    /// A foreign key constraint was violated
    ForeignKeyViolation,
    /// No constraint violation - some other error occurred
    Other(SqlxError),
}

/// Check the type of database constraint violation
pub fn check_constraint_violation(error: SqlxError) -> ConstraintViolation {
    if let SqlxError::Database(ref db_err) = error {
        if db_err.is_unique_violation() {
            return ConstraintViolation::UniqueViolation;
        }
        if db_err.is_foreign_key_violation() {
            return ConstraintViolation::ForeignKeyViolation;
        }
    }
    ConstraintViolation::Other(error)
}

/// Convert a failed write on `entity` identified by `key` into a [`StoreError`]
///
/// `RowNotFound` from an `UPDATE ... RETURNING` is reported as a missing
/// reference, the same way a foreign key violation is.
pub fn map_constraint_violation(error: SqlxError, entity: &'static str, key: &str) -> StoreError {
    if matches!(error, SqlxError::RowNotFound) {
        return StoreError::missing(entity, key);
    }
    match check_constraint_violation(error) {
        ConstraintViolation::UniqueViolation => StoreError::unique(entity, key),
        ConstraintViolation::ForeignKeyViolation => StoreError::missing(entity, key),
        ConstraintViolation::Other(e) => StoreError::Sqlx(e),
    }
}
