//! Configuration loading for Parlor.
//!
//! Reads `config.toml` from the data directory (`~/.parlor/` by default)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use parlor_types::config::AppConfig;

/// Resolve the data directory: `PARLOR_DATA_DIR` if set, otherwise
/// `~/.parlor` (falling back to `./.parlor` when no home dir exists).
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PARLOR_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".parlor")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// SQLite connection URL for the configured database file.
pub fn database_url(data_dir: &Path, config: &AppConfig) -> String {
    format!(
        "sqlite://{}?mode=rwc",
        data_dir.join(&config.database_file).display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config.database_file, "parlor.db");
    }

    #[tokio::test]
    async fn test_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            "database_file = \"chat.db\"\ndefault_validity_hours = 72\n",
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.database_file, "chat.db");
        assert_eq!(config.default_validity_hours, 72);
    }

    #[tokio::test]
    async fn test_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.database_file, "parlor.db");
    }

    #[tokio::test]
    async fn test_database_url_uses_configured_file() {
        let tmp = TempDir::new().unwrap();
        let config = AppConfig::default();
        let url = database_url(tmp.path(), &config);
        assert!(url.starts_with("sqlite://"));
        assert!(url.contains("parlor.db"));
    }
}
