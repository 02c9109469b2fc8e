//! Presentation assets.
//!
//! The background image is shipped to clients as a base64 `data:` URL so a
//! page can use it without a second request.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;

use mindwell_types::error::AssetError;

/// A background image encoded as a data URL.
#[derive(Debug, Clone, Serialize)]
pub struct BackgroundAsset {
    pub path: PathBuf,
    pub mime_type: &'static str,
    pub data_url: String,
}

impl BackgroundAsset {
    /// Read and encode the image at `path`.
    pub async fn load(path: &Path) -> Result<Self, AssetError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(AssetError::Missing(path.to_path_buf()));
            }
            Err(err) => {
                return Err(AssetError::Unreadable {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                });
            }
        };

        let mime_type = mime_for(path);
        Ok(Self {
            path: path.to_path_buf(),
            mime_type,
            data_url: format!("data:{mime_type};base64,{}", STANDARD.encode(&bytes)),
        })
    }

    /// Check that the configured background exists without reading it,
    /// logging a warning when it does not.
    ///
    /// `false` when no background is configured.
    pub async fn check_configured(path: Option<&Path>) -> bool {
        let Some(path) = path else {
            return false;
        };
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => {
                tracing::debug!(path = %path.display(), "Background image available");
                true
            }
            Ok(_) => {
                tracing::warn!("Background image unavailable: {} is not a file", path.display());
                false
            }
            Err(err) => {
                let err = if err.kind() == std::io::ErrorKind::NotFound {
                    AssetError::Missing(path.to_path_buf())
                } else {
                    AssetError::Unreadable {
                        path: path.to_path_buf(),
                        message: err.to_string(),
                    }
                };
                tracing::warn!("Background image unavailable: {err}");
                false
            }
        }
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}
