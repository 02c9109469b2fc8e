//! HttpTranscriber -- [`Transcriber`] for OpenAI-compatible
//! `/audio/transcriptions` endpoints (whisper.cpp server, faster-whisper,
//! LocalAI, OpenAI itself).
//!
//! The clip is sent as a multipart form with `file` and `model` fields and
//! the JSON response's `text` field is returned.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use mindwell_core::speech::Transcriber;
use mindwell_types::config::SpeechConfig;
use mindwell_types::speech::{AudioClip, SpeechError};

const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

/// Transcribes clips over HTTP.
///
/// Does NOT derive Debug: it may hold an API key.
pub struct HttpTranscriber {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<SecretString>,
}

impl HttpTranscriber {
    /// Build from the `[speech]` config section.
    pub fn new(config: &SpeechConfig, api_key: Option<SecretString>) -> Result<Self, SpeechError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SpeechError::ServiceUnreachable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint_url(&config.transcription_url),
            model: config
                .transcription_model
                .clone()
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_MODEL.to_string()),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn endpoint_url(base: &str) -> String {
    format!("{}/audio/transcriptions", base.trim_end_matches('/'))
}

impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, clip: AudioClip) -> Result<String, SpeechError> {
        let bytes_len = clip.bytes.len();
        let part = Part::bytes(clip.bytes)
            .file_name(clip.file_name)
            .mime_str(&clip.mime_type)
            .map_err(|e| SpeechError::ServiceUnreachable(format!("invalid clip type: {e}")))?;
        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "json");

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        tracing::debug!(endpoint = %self.endpoint, bytes = bytes_len, "Sending clip for transcription");
        let response = request
            .send()
            .await
            .map_err(|e| SpeechError::ServiceUnreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::ServiceUnreachable(format!("HTTP {status}: {body}")));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::ServiceUnreachable(format!("bad transcription response: {e}")))?;

        let text = parsed.text.trim();
        if text.is_empty() {
            return Err(SpeechError::Unintelligible);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url() {
        assert_eq!(
            endpoint_url("http://localhost:8080/v1/"),
            "http://localhost:8080/v1/audio/transcriptions"
        );
        assert_eq!(
            endpoint_url("https://api.openai.com/v1"),
            "https://api.openai.com/v1/audio/transcriptions"
        );
    }

    #[test]
    fn new_uses_default_model() {
        let transcriber = HttpTranscriber::new(&SpeechConfig::default(), None).unwrap();
        assert_eq!(transcriber.model, DEFAULT_TRANSCRIPTION_MODEL);
        assert!(transcriber.endpoint().ends_with("/audio/transcriptions"));
    }

    #[test]
    fn response_without_text_is_empty() {
        let parsed: TranscriptionResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.text.is_empty());
    }

    #[tokio::test]
    async fn unreachable_service() {
        let config = SpeechConfig {
            // Port 9 (discard) on localhost is closed in test environments.
            transcription_url: "http://127.0.0.1:9/v1".to_string(),
            ..SpeechConfig::default()
        };
        let transcriber = HttpTranscriber::new(&config, None).unwrap();
        let clip = AudioClip {
            bytes: vec![0u8; 16],
            file_name: "clip.wav".to_string(),
            mime_type: "audio/wav".to_string(),
        };
        assert!(matches!(
            transcriber.transcribe(clip).await,
            Err(SpeechError::ServiceUnreachable(_))
        ));
    }
}
