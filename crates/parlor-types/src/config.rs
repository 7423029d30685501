//! Application configuration read from `config.toml` in the data directory.

use serde::{Deserialize, Serialize};

fn default_database_file() -> String {
    "parlor.db".to_string()
}

fn default_validity_hours() -> i64 {
    24
}

/// Global configuration for the Parlor process.
///
/// Every field has a default so a missing or partial `config.toml`
/// still yields a working configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database filename, relative to the data directory.
    #[serde(default = "default_database_file")]
    pub database_file: String,
    /// Validity window (hours) applied to new conversations when the
    /// creator does not specify one.
    #[serde(default = "default_validity_hours")]
    pub default_validity_hours: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            default_validity_hours: default_validity_hours(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database_file, "parlor.db");
        assert_eq!(config.default_validity_hours, 24);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str("default_validity_hours = 48").unwrap();
        assert_eq!(config.database_file, "parlor.db");
        assert_eq!(config.default_validity_hours, 48);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.database_file, AppConfig::default().database_file);
    }
}
