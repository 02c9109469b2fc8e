//! Ollama REST API types.
//!
//! Ollama-specific request/response structures for `/api/chat` and
//! `/api/tags`. They are NOT the generic generation types from
//! mindwell-types.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<OllamaMessage>,
    pub stream: bool,
    pub options: OllamaOptions,
}

/// A single message in an Ollama conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// Model runtime options.
#[derive(Debug, Clone, Serialize)]
pub struct OllamaOptions {
    /// Maximum number of tokens to generate.
    pub num_predict: u32,
}

/// One line of the NDJSON response stream.
///
/// Intermediate lines carry a `message` with a content fragment; the last
/// line has `done: true` and the token counts. Failures arrive as a line
/// with only `error` set.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaChatChunk {
    #[serde(default)]
    pub message: Option<OllamaMessage>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub eval_count: Option<u32>,
}

/// Response from `GET /api/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaTagsResponse {
    #[serde(default)]
    pub models: Vec<OllamaModelTag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaModelTag {
    pub name: String,
}

/// Error body Ollama returns with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaErrorBody {
    pub error: String,
}
