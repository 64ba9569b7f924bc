//! Error types shared across biocat crates

use thiserror::Error;

/// Result type alias for biocat operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised outside the HTTP request path (loader, tooling)
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at {location}: {message}")]
    Parse { location: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl CatalogError {
    /// Build a parse error for a position in an input file
    pub fn parse(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            location: location.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = CatalogError::parse("pfam_descriptions.csv:3", "expected 2 columns, found 1");
        assert_eq!(
            err.to_string(),
            "Parse error at pfam_descriptions.csv:3: expected 2 columns, found 1"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CatalogError = io.into();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
