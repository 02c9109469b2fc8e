//! OpenAI SSE stream to [`StreamEvent`] adapter.
//!
//! Maps `async-openai`'s chat completion chunks to the provider-agnostic
//! [`StreamEvent`] enum defined in `mindwell-types`.

use futures_util::{Stream, StreamExt};

use async_openai::error::OpenAIError;
use async_openai::types::chat::CreateChatCompletionStreamResponse;

use mindwell_core::llm::provider::EventStream;
use mindwell_types::llm::{LlmError, StreamEvent, Usage};

/// Map a stream of chat completion chunks to a stream of [`StreamEvent`]s.
///
/// Emits a `Fragment` per non-empty content delta, `Usage` when the server
/// reports it (requires `stream_options.include_usage`), and a final `Done`.
pub fn map_openai_stream<S>(stream: S) -> EventStream
where
    S: Stream<Item = Result<CreateChatCompletionStreamResponse, OpenAIError>> + Send + 'static,
{
    Box::pin(async_stream::try_stream! {
        let mut stream = Box::pin(stream);

        while let Some(result) = stream.next().await {
            let chunk = result.map_err(|e| LlmError::Stream(e.to_string()))?;
            for event in chunk_events(&chunk) {
                yield event;
            }
        }

        yield StreamEvent::Done;
    })
}

/// Events carried by one chunk.
pub(crate) fn chunk_events(chunk: &CreateChatCompletionStreamResponse) -> Vec<StreamEvent> {
    let mut events = Vec::new();

    for choice in &chunk.choices {
        if let Some(text) = &choice.delta.content {
            if !text.is_empty() {
                events.push(StreamEvent::Fragment { text: text.clone() });
            }
        }
    }

    // The final chunk carries usage with an empty choices array.
    if let Some(usage) = &chunk.usage {
        events.push(StreamEvent::Usage(Usage {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        }));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(value: serde_json::Value) -> CreateChatCompletionStreamResponse {
        serde_json::from_value(value).unwrap()
    }

    fn content_chunk(content: &str) -> CreateChatCompletionStreamResponse {
        chunk(serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion.chunk",
            "created": 1_714_000_000,
            "model": "llama3",
            "choices": [{
                "index": 0,
                "delta": {"role": "assistant", "content": content},
                "logprobs": null,
                "finish_reason": null
            }]
        }))
    }

    fn usage_chunk() -> CreateChatCompletionStreamResponse {
        chunk(serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion.chunk",
            "created": 1_714_000_000,
            "model": "llama3",
            "choices": [],
            "usage": {"prompt_tokens": 20, "completion_tokens": 5, "total_tokens": 25}
        }))
    }

    #[test]
    fn test_content_delta_becomes_fragment() {
        assert_eq!(
            chunk_events(&content_chunk("Breathe")),
            vec![StreamEvent::Fragment {
                text: "Breathe".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_delta_is_skipped() {
        assert!(chunk_events(&content_chunk("")).is_empty());
    }

    #[test]
    fn test_usage_chunk() {
        assert_eq!(
            chunk_events(&usage_chunk()),
            vec![StreamEvent::Usage(Usage {
                input_tokens: 20,
                output_tokens: 5
            })]
        );
    }

    #[tokio::test]
    async fn test_stream_ends_with_done() {
        let chunks = vec![Ok(content_chunk("In")), Ok(content_chunk("out")), Ok(usage_chunk())];
        let events: Vec<_> = map_openai_stream(futures_util::stream::iter(chunks)).collect().await;
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], Ok(StreamEvent::Fragment { ref text }) if text == "In"));
        assert!(matches!(events[3], Ok(StreamEvent::Done)));
    }

    #[tokio::test]
    async fn test_stream_error_stops_stream() {
        let chunks = vec![
            Ok(content_chunk("In")),
            Err(OpenAIError::InvalidArgument("connection dropped".to_string())),
        ];
        let events: Vec<_> = map_openai_stream(futures_util::stream::iter(chunks)).collect().await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], Err(LlmError::Stream(_))));
    }
}
