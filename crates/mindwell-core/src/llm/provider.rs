//! LlmProvider trait definition.
//!
//! This is the core abstraction that all generation backends implement.
//! Uses RPITIT for `check`, and `Pin<Box<dyn Stream>>` for `stream`
//! (streams need to be object-safe for the BoxLlmProvider wrapper).

use std::pin::Pin;

use futures_util::Stream;

use mindwell_types::llm::{GenerationRequest, LlmError, StreamEvent};

/// Boxed stream of generation events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Trait for generation backends (Ollama, OpenAI-compatible servers).
///
/// Providers are stateless between calls: a stream borrows nothing from the
/// provider and the provider never records conversation state.
///
/// Implementations live in mindwell-infra (e.g., `OllamaProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "ollama").
    fn name(&self) -> &str;

    /// Model used when a request leaves `model` empty.
    fn model(&self) -> &str;

    /// Start a streaming generation.
    ///
    /// The stream is lazy: nothing is sent until it is first polled.
    /// It yields `Fragment` events in output order, optionally a `Usage`
    /// event, and ends with `Done`. Transport and backend failures surface
    /// as an `Err` item, after which the stream ends.
    fn stream(&self, request: GenerationRequest) -> EventStream;

    /// Verify the backend is reachable and serves the configured model.
    fn check(&self) -> impl std::future::Future<Output = Result<(), LlmError>> + Send;
}
