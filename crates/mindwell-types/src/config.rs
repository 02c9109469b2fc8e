//! Configuration types for Mindwell.
//!
//! `MindwellConfig` represents the top-level `config.toml`. Every field has a
//! default, so an empty file (or no file at all) yields a working setup that
//! talks to a local Ollama instance.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::llm::{DEFAULT_MAX_TOKENS, ProviderType};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MindwellConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
}

/// Generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_provider")]
    pub provider: ProviderType,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Only used by `openai_compatible` servers that require a key.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Connect timeout for the HTTP client. Generation itself has no timeout.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_provider() -> ProviderType {
    ProviderType::Ollama
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_key: None,
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Speech-to-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// OpenAI-compatible transcription endpoint base, e.g. a local whisper server.
    #[serde(default = "default_transcription_url")]
    pub transcription_url: String,
    #[serde(default)]
    pub transcription_model: Option<String>,
    #[serde(default = "default_listen_timeout_secs")]
    pub listen_timeout_secs: u64,
}

fn default_transcription_url() -> String {
    "http://localhost:8080/v1".to_string()
}

fn default_listen_timeout_secs() -> u64 {
    5
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            transcription_url: default_transcription_url(),
            transcription_model: None,
            listen_timeout_secs: default_listen_timeout_secs(),
        }
    }
}

/// Conversation display and context settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// How many recent turns to replay when a chat view opens.
    #[serde(default = "default_display_tail")]
    pub display_tail: usize,
    /// How many recent turns to send to the backend. `0` sends everything.
    #[serde(default = "default_context_turns")]
    pub context_turns: usize,
}

fn default_display_tail() -> usize {
    5
}

fn default_context_turns() -> usize {
    40
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            display_tail: default_display_tail(),
            context_turns: default_context_turns(),
        }
    }
}

/// Optional presentation assets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetsConfig {
    #[serde(default)]
    pub background_image: Option<PathBuf>,
}
