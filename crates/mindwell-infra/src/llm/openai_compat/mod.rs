//! OpenAI-compatible generation backend.
//!
//! One [`OpenAiCompatibleProvider`] serves any server that speaks the chat
//! completions protocol: llama.cpp `server`, LM Studio, vLLM, LocalAI, or
//! OpenAI itself. The base URL decides which.
//!
//! Uses [`async_openai`] for request types and built-in SSE streaming.

pub mod streaming;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, ChatCompletionStreamOptions,
    CreateChatCompletionRequest,
};
use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};

use mindwell_core::llm::provider::{EventStream, LlmProvider};
use mindwell_types::chat::{Role, Turn};
use mindwell_types::config::BackendConfig;
use mindwell_types::llm::{GenerationRequest, LlmError};

use self::streaming::map_openai_stream;

/// Provider for any OpenAI-compatible chat completions API.
///
/// Does NOT derive Debug: the `async_openai::Client` holds the API key.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(base_url: &str, model: &str, api_key: Option<SecretString>) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_base(base_url.trim_end_matches('/'));
        if let Some(key) = api_key {
            openai_config = openai_config.with_api_key(key.expose_secret());
        }

        Self {
            client: Client::with_config(openai_config),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        let api_key = config.api_key.clone().map(SecretString::from);
        Self::new(&config.base_url, &config.model, api_key)
    }

    fn build_request(&self, request: &GenerationRequest, stream: bool) -> CreateChatCompletionRequest {
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        let mut req = CreateChatCompletionRequest {
            model,
            messages: request.messages.iter().map(to_openai_message).collect(),
            max_completion_tokens: Some(request.limits.max_tokens),
            ..Default::default()
        };

        if stream {
            req.stream = Some(true);
            req.stream_options = Some(ChatCompletionStreamOptions {
                include_usage: Some(true),
                include_obfuscation: None,
            });
        }

        req
    }
}

fn to_openai_message(turn: &Turn) -> ChatCompletionRequestMessage {
    match turn.role {
        Role::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(turn.content.clone()),
            name: None,
        }),
        Role::Assistant => {
            #[allow(deprecated)]
            ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                    turn.content.clone(),
                )),
                refusal: None,
                name: None,
                audio: None,
                tool_calls: None,
                function_call: None,
            })
        }
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai_compatible"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn stream(&self, request: GenerationRequest) -> EventStream {
        let oai_request = self.build_request(&request, true);
        let client = self.client.clone();

        Box::pin(async_stream::try_stream! {
            let oai_stream = client
                .chat()
                .create_stream(oai_request)
                .await
                .map_err(map_openai_error)?;

            let mut inner = map_openai_stream(oai_stream);
            while let Some(event) = inner.next().await {
                yield event?;
            }
        })
    }

    /// Sends a one-token completion, the cheapest call every compatible
    /// server supports.
    async fn check(&self) -> Result<(), LlmError> {
        let probe = GenerationRequest {
            model: String::new(),
            messages: vec![Turn::user("Hello")],
            limits: mindwell_types::llm::GenerationLimits { max_tokens: 1 },
        };
        self.client
            .chat()
            .create(self.build_request(&probe, false))
            .await
            .map_err(map_openai_error)?;
        Ok(())
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            if code == "model_not_found" || api_err.message.contains("model not found") {
                LlmError::ModelNotFound(api_err.message.clone())
            } else {
                LlmError::BackendUnavailable(err.to_string())
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(404) => LlmError::ModelNotFound(err.to_string()),
            _ => LlmError::BackendUnavailable(err.to_string()),
        },
        OpenAIError::JSONDeserialize(_, content) => {
            LlmError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::StreamError(stream_err) => LlmError::Stream(stream_err.to_string()),
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::BackendUnavailable(err.to_string()),
    }
}
