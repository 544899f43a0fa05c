//! Filter compilation configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use tablestore_core::{Error, Result};

/// Number of discrete comparisons the hosted table service allows per filter
pub const DOCUMENTED_COMPARISON_LIMIT: usize = 15;

/// Filter compilation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Reject filters that reference no property
    pub validate_identifiers: bool,

    /// Maximum comparison operators per filter
    pub max_comparisons: Option<usize>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            validate_identifiers: true,
            max_comparisons: None,
        }
    }
}

impl FilterConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that enforces the hosted service's documented limits
    pub fn strict() -> Self {
        Self::default().max_comparisons(DOCUMENTED_COMPARISON_LIMIT)
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("invalid filter config: {}", e)))
    }

    /// Load a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn validate_identifiers(mut self, enabled: bool) -> Self {
        self.validate_identifiers = enabled;
        self
    }

    pub fn max_comparisons(mut self, limit: usize) -> Self {
        self.max_comparisons = Some(limit);
        self
    }

    pub fn unlimited_comparisons(mut self) -> Self {
        self.max_comparisons = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert!(config.validate_identifiers);
        assert_eq!(config.max_comparisons, None);
        assert_eq!(FilterConfig::strict().max_comparisons, Some(15));
    }

    #[test]
    fn test_builder() {
        let config = FilterConfig::new()
            .validate_identifiers(false)
            .max_comparisons(4);
        assert!(!config.validate_identifiers);
        assert_eq!(config.max_comparisons, Some(4));
        assert_eq!(config.unlimited_comparisons().max_comparisons, None);
    }

    #[test]
    fn test_from_json() {
        let config = FilterConfig::from_json(r#"{"max_comparisons": 2}"#).unwrap();
        assert!(config.validate_identifiers);
        assert_eq!(config.max_comparisons, Some(2));

        assert_eq!(FilterConfig::from_json("{}").unwrap(), FilterConfig::default());

        let err = FilterConfig::from_json(r#"{"validate_identifiers": "yes"}"#).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"validate_identifiers": false, "max_comparisons": null}}"#).unwrap();

        let config = FilterConfig::from_file(file.path()).unwrap();
        assert!(!config.validate_identifiers);
        assert_eq!(config.max_comparisons, None);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FilterConfig::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = FilterConfig::strict().validate_identifiers(false);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(FilterConfig::from_json(&json).unwrap(), config);
    }
}
