//! Schema assembly configuration.
//!
//! # Example Configuration
//!
//! ```toml
//! [graphql]
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for [`SchemaAssembler`](crate::SchemaAssembler).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Maximum query depth allowed.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    /// Default: 500
    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    /// Enable GraphQL introspection queries.
    /// Default: true (development-friendly)
    #[serde(default = "default_introspection")]
    pub introspection: bool,
}

fn default_max_depth() -> usize {
    15
}

fn default_max_complexity() -> usize {
    500
}

fn default_introspection() -> bool {
    true
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            introspection: default_introspection(),
        }
    }
}

impl SchemaConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error message if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("graphql.max_depth must be > 0".into());
        }
        if self.max_complexity == 0 {
            return Err("graphql.max_complexity must be > 0".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchemaConfig::default();
        assert_eq!(config.max_depth, 15);
        assert_eq!(config.max_complexity, 500);
        assert!(config.introspection);
    }

    #[test]
    fn test_valid_config() {
        let config = SchemaConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_max_depth() {
        let mut config = SchemaConfig::default();
        config.max_depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_max_complexity() {
        let mut config = SchemaConfig::default();
        config.max_complexity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let toml = r#"
            max_depth = 20
            max_complexity = 1000
            introspection = false
        "#;

        let config: SchemaConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.max_depth, 20);
        assert_eq!(config.max_complexity, 1000);
        assert!(!config.introspection);
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: SchemaConfig = toml::from_str("").unwrap();
        assert_eq!(config.max_depth, 15);
        assert!(config.introspection);
    }
}
