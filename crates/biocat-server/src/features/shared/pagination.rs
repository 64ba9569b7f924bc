//! Shared pagination utilities
//!
//! Limit/offset pagination for list queries.
//!
//! # Examples
//!
//! ```rust,ignore
//! use biocat_server::features::shared::pagination::{Paginated, PaginationParams};
//!
//! let params = PaginationParams::new(Some(20), Some(40));
//! let limit = params.limit(default_page_size);
//!
//! // After fetching data...
//! let page = Paginated::new(items, total, limit, params.offset());
//! ```

use serde::{Deserialize, Serialize};

use crate::config::MAX_PAGE_SIZE;

/// Common pagination request parameters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaginationParams {
    /// Items per page. Falls back to the configured default, clamped to 1-100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,

    /// Number of items to skip. Defaults to 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Create new pagination parameters
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self { limit, offset }
    }

    /// Get items per page, clamped to 1-100
    pub fn limit(&self, default: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
    }

    /// Get the number of items to skip
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    /// Validate pagination parameters
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(limit) = self.limit {
            if !(1..=MAX_PAGE_SIZE).contains(&limit) {
                return Err("Limit must be between 1 and 100");
            }
        }
        if let Some(offset) = self.offset {
            if offset < 0 {
                return Err("Offset cannot be negative");
            }
        }
        Ok(())
    }
}

/// One page of a list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Total number of items across all pages
    pub count: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_next: bool,
    pub has_prev: bool,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(results: Vec<T>, count: i64, limit: i64, offset: i64) -> Self {
        Self {
            count,
            limit,
            offset,
            has_next: offset.saturating_add(limit) < count,
            has_prev: offset > 0,
            results,
        }
    }

    /// Map items to a different type
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            count: self.count,
            limit: self.limit,
            offset: self.offset,
            has_next: self.has_next,
            has_prev: self.has_prev,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
