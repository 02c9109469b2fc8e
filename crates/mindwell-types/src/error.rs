use std::path::PathBuf;

use thiserror::Error;

/// Errors related to presentation assets.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset '{}' not found", .0.display())]
    Missing(PathBuf),

    #[error("failed to read asset '{}': {message}", path.display())]
    Unreadable { path: PathBuf, message: String },
}

/// Errors related to configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}
