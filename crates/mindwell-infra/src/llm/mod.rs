//! Generation backend implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] trait defined in
//! `mindwell-core`, plus a factory ([`create_provider`]) that builds the
//! configured backend.
//!
//! [`LlmProvider`]: mindwell_core::llm::provider::LlmProvider

pub mod ollama;
pub mod openai_compat;

use mindwell_core::llm::box_provider::BoxLlmProvider;
use mindwell_types::config::BackendConfig;
use mindwell_types::llm::{LlmError, ProviderType};

use self::ollama::OllamaProvider;
use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from the `[backend]` config section.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the model name is
/// empty.
pub fn create_provider(config: &BackendConfig) -> Result<BoxLlmProvider, LlmError> {
    if config.model.trim().is_empty() {
        return Err(LlmError::InvalidRequest("backend model must not be empty".to_string()));
    }

    let provider = match config.provider {
        ProviderType::Ollama => BoxLlmProvider::new(OllamaProvider::from_config(config)?),
        ProviderType::OpenAiCompatible => {
            BoxLlmProvider::new(OpenAiCompatibleProvider::from_config(config))
        }
    };

    tracing::debug!(
        provider = provider.name(),
        model = provider.model(),
        base_url = %config.base_url,
        "Generation backend configured"
    );
    Ok(provider)
}
