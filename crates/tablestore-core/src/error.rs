//! Error types for tablestore
//!
//! Filter compilation fails in exactly two ways: a syntax error raised by the
//! parser, or a semantic error raised once a syntactically valid tree has been
//! inspected. The remaining variants cover loading configuration and records.

use thiserror::Error;

/// The main error type for tablestore operations
#[derive(Error, Debug)]
pub enum Error {
    // ========== Query Errors ==========
    #[error("Query syntax error: unexpected {found} at position {position}, expected one of: {}", .expected.join(", "))]
    QuerySyntax {
        found: String,
        position: usize,
        expected: Vec<String>,
    },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    // ========== Configuration Errors ==========
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ========== Serialization Errors ==========
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ========== IO Errors ==========
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tablestore operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if the filter string could not be parsed
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Error::QuerySyntax { .. })
    }

    /// Returns true if the filter parsed but was rejected on inspection
    pub fn is_semantic_error(&self) -> bool {
        matches!(self, Error::InvalidQuery(_))
    }

    /// Returns true if this error should be reported as a bad client query
    pub fn is_query_error(&self) -> bool {
        self.is_syntax_error() || self.is_semantic_error()
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::QuerySyntax {
            found: "comparison-operator 'eq'".to_string(),
            position: 16,
            expected: vec!["identifier".to_string(), "string".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Query syntax error: unexpected comparison-operator 'eq' at position 16, expected one of: identifier, string"
        );

        let err = Error::InvalidQuery("no identifiers".to_string());
        assert_eq!(err.to_string(), "Invalid query: no identifiers");
    }

    #[test]
    fn test_error_classes() {
        let syntax = Error::QuerySyntax {
            found: "end-of-query".to_string(),
            position: 0,
            expected: vec![],
        };
        assert!(syntax.is_syntax_error());
        assert!(!syntax.is_semantic_error());
        assert!(syntax.is_query_error());

        let semantic = Error::InvalidQuery("test".to_string());
        assert!(semantic.is_semantic_error());
        assert!(semantic.is_query_error());

        assert!(!Error::Configuration("test".to_string()).is_query_error());
    }

    #[test]
    fn test_from_json_error() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
