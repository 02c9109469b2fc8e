//! NDJSON stream decoding for Ollama `/api/chat`.
//!
//! Ollama streams one JSON object per line. HTTP body chunks do not respect
//! line boundaries: a chunk may hold several lines, part of a line, or even
//! split a multi-byte character. Bytes are buffered until a newline arrives
//! and only complete lines are parsed.

use futures_util::{Stream, StreamExt};

use mindwell_core::llm::provider::EventStream;
use mindwell_types::llm::{LlmError, StreamEvent, Usage};

use super::types::OllamaChatChunk;

/// Decode an Ollama NDJSON body into [`StreamEvent`]s.
///
/// Emits a `Fragment` per non-empty content piece, then `Usage` (when the
/// final line carries token counts) and `Done`. An `error` line or a body
/// read failure ends the stream with an error. A body that ends without a
/// `done` line is treated as complete.
pub fn decode_ndjson<S, B, E>(body: S) -> EventStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    Box::pin(async_stream::try_stream! {
        let mut body = Box::pin(body);
        let mut buffer: Vec<u8> = Vec::new();
        let mut finished = false;

        'read: while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| LlmError::Stream(format!("response body: {e}")))?;
            buffer.extend_from_slice(chunk.as_ref());

            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                for event in decode_line(&line)? {
                    let done = matches!(event, StreamEvent::Done);
                    yield event;
                    if done {
                        finished = true;
                        break 'read;
                    }
                }
            }
        }

        if !finished {
            // The last line may lack a trailing newline.
            for event in decode_line(&buffer)? {
                finished |= matches!(event, StreamEvent::Done);
                yield event;
            }
        }
        if !finished {
            tracing::debug!("Ollama stream ended without a done line");
            yield StreamEvent::Done;
        }
    })
}

/// Decode one NDJSON line. Blank lines decode to nothing.
pub(crate) fn decode_line(line: &[u8]) -> Result<Vec<StreamEvent>, LlmError> {
    let text = std::str::from_utf8(line)
        .map_err(|e| LlmError::Deserialization(format!("invalid UTF-8 in stream: {e}")))?
        .trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let chunk: OllamaChatChunk = serde_json::from_str(text)
        .map_err(|e| LlmError::Deserialization(format!("failed to parse stream line: {e}")))?;

    if let Some(error) = chunk.error {
        return Err(LlmError::BackendUnavailable(error));
    }

    let mut events = Vec::new();
    if let Some(message) = chunk.message {
        // The final line repeats an empty assistant message.
        if !message.content.is_empty() {
            events.push(StreamEvent::Fragment {
                text: message.content,
            });
        }
    }
    if chunk.done {
        if chunk.prompt_eval_count.is_some() || chunk.eval_count.is_some() {
            events.push(StreamEvent::Usage(Usage {
                input_tokens: chunk.prompt_eval_count.unwrap_or(0),
                output_tokens: chunk.eval_count.unwrap_or(0),
            }));
        }
        events.push(StreamEvent::Done);
    }
    Ok(events)
}
