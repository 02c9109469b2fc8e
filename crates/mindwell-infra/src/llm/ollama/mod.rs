//! OllamaProvider -- concrete [`LlmProvider`] for a local Ollama server.
//!
//! Sends the windowed conversation to `/api/chat` with streaming enabled and
//! decodes the NDJSON response incrementally. `check` lists the installed
//! models via `/api/tags`.

pub mod streaming;
pub mod types;

use std::time::Duration;

use futures_util::StreamExt;

use mindwell_core::llm::provider::{EventStream, LlmProvider};
use mindwell_types::config::BackendConfig;
use mindwell_types::llm::{GenerationRequest, LlmError};

use self::streaming::decode_ndjson;
use self::types::{OllamaChatRequest, OllamaErrorBody, OllamaMessage, OllamaOptions, OllamaTagsResponse};

/// Ollama generation backend.
///
/// Only a connect timeout is set on the client: generation itself is never
/// cut short.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str, connect_timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| LlmError::BackendUnavailable(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, LlmError> {
        Self::new(
            &config.base_url,
            &config.model,
            Duration::from_secs(config.connect_timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn to_ollama_request(&self, request: &GenerationRequest) -> OllamaChatRequest {
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        OllamaChatRequest {
            model,
            messages: request
                .messages
                .iter()
                .map(|turn| OllamaMessage {
                    role: turn.role.to_string(),
                    content: turn.content.clone(),
                })
                .collect(),
            stream: true,
            options: OllamaOptions {
                num_predict: request.limits.max_tokens,
            },
        }
    }
}

/// Map a non-2xx response to an [`LlmError`].
fn status_error(status: reqwest::StatusCode, body: &str, model: &str) -> LlmError {
    let message = serde_json::from_str::<OllamaErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.to_string());
    match status.as_u16() {
        404 => LlmError::ModelNotFound(model.to_string()),
        400 => LlmError::InvalidRequest(message),
        _ => LlmError::BackendUnavailable(format!("HTTP {status}: {message}")),
    }
}

/// Whether an installed tag satisfies the configured model name.
///
/// `llama3` matches `llama3:latest`; an explicit tag must match exactly.
fn tag_matches(installed: &str, wanted: &str) -> bool {
    if installed == wanted {
        return true;
    }
    !wanted.contains(':') && installed.split(':').next() == Some(wanted)
}

impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn stream(&self, request: GenerationRequest) -> EventStream {
        let body = self.to_ollama_request(&request);
        let url = self.url("/api/chat");
        let client = self.client.clone();

        Box::pin(async_stream::try_stream! {
            tracing::debug!(url = %url, model = %body.model, messages = body.messages.len(), "Ollama chat request");

            let response = client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| LlmError::BackendUnavailable(format!("HTTP request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                Err::<(), _>(status_error(status, &text, &body.model))?;
            } else {
                let mut inner = decode_ndjson(response.bytes_stream());
                while let Some(event) = inner.next().await {
                    yield event?;
                }
            }
        })
    }

    async fn check(&self) -> Result<(), LlmError> {
        let response = self
            .client
            .get(self.url("/api/tags"))
            .send()
            .await
            .map_err(|e| LlmError::BackendUnavailable(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text, &self.model));
        }

        let tags: OllamaTagsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse /api/tags: {e}")))?;

        if tags.models.iter().any(|m| tag_matches(&m.name, &self.model)) {
            Ok(())
        } else {
            Err(LlmError::ModelNotFound(self.model.clone()))
        }
    }
}
