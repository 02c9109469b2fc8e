//! Configuration loader for Mindwell.
//!
//! Reads `config.toml` from the data directory (`~/.mindwell/` in production)
//! and deserializes it into [`MindwellConfig`]. Falls back to defaults when
//! the file is missing or malformed.

use std::path::{Path, PathBuf};

use mindwell_types::config::MindwellConfig;
use mindwell_types::error::ConfigError;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "MINDWELL_DATA_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory.
///
/// `MINDWELL_DATA_DIR` wins, then `~/.mindwell`, then `./.mindwell` when no
/// home directory can be determined.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".mindwell"))
        .unwrap_or_else(|| PathBuf::from(".mindwell"))
}

/// Path of the config file inside `data_dir`.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Load `{data_dir}/config.toml`, reporting read and parse failures.
///
/// A missing file is not an error: it yields `Ok(None)`.
pub async fn try_load_config(data_dir: &Path) -> Result<Option<MindwellConfig>, ConfigError> {
    let path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(ConfigError::Read {
                path,
                message: err.to_string(),
            });
        }
    };

    toml::from_str::<MindwellConfig>(&content)
        .map(Some)
        .map_err(|err| ConfigError::Parse {
            path,
            message: err.to_string(),
        })
}

/// Load configuration, falling back to [`MindwellConfig::default()`].
///
/// - Missing file: defaults, logged at debug.
/// - Unreadable or malformed file: defaults, logged as a warning.
pub async fn load_config(data_dir: &Path) -> MindwellConfig {
    match try_load_config(data_dir).await {
        Ok(Some(config)) => config,
        Ok(None) => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path(data_dir).display()
            );
            MindwellConfig::default()
        }
        Err(err) => {
            tracing::warn!("{err}, using defaults");
            MindwellConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindwell_types::llm::ProviderType;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        assert!(try_load_config(tmp.path()).await.unwrap().is_none());

        let config = load_config(tmp.path()).await;
        assert_eq!(config.backend.model, "llama3");
        assert_eq!(config.backend.max_tokens, 80);
        assert_eq!(config.history.display_tail, 5);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let toml_content = r#"
[backend]
provider = "openai_compatible"
base_url = "http://localhost:8000/v1"
model = "mistral"
max_tokens = 120

[history]
display_tail = 10
"#;
        tokio::fs::write(tmp.path().join("config.toml"), toml_content)
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.backend.provider, ProviderType::OpenAiCompatible);
        assert_eq!(config.backend.model, "mistral");
        assert_eq!(config.backend.max_tokens, 120);
        assert_eq!(config.history.display_tail, 10);
        // Untouched sections keep their defaults
        assert_eq!(config.speech.listen_timeout_secs, 5);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is [[[not valid toml")
            .await
            .unwrap();

        let err = try_load_config(tmp.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let config = load_config(tmp.path()).await;
        assert_eq!(config.backend.model, "llama3");
    }

    #[test]
    fn config_path_is_inside_data_dir() {
        let path = config_path(Path::new("/tmp/mindwell"));
        assert_eq!(path, PathBuf::from("/tmp/mindwell/config.toml"));
    }
}
