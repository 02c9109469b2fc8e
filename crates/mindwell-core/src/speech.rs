//! Speech capture ports.
//!
//! Capture is split into recording a clip ([`AudioSource`]) and turning it
//! into text ([`Transcriber`]). [`SpeechPipeline`] joins the two and enforces
//! the listen timeout.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use mindwell_types::speech::{AudioClip, SpeechError};

/// Default time allowed for a clip to become available.
pub const DEFAULT_LISTEN_TIMEOUT: Duration = Duration::from_secs(5);

/// Produces recognized text from the user's voice.
pub trait SpeechCapture: Send + Sync {
    fn capture(&self) -> impl Future<Output = Result<String, SpeechError>> + Send;
}

/// Records one audio clip.
pub trait AudioSource: Send + Sync {
    fn record(&self) -> impl Future<Output = Result<AudioClip, SpeechError>> + Send;
}

/// Converts an audio clip to text.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, clip: AudioClip) -> impl Future<Output = Result<String, SpeechError>> + Send;
}

/// An [`AudioSource`] followed by a [`Transcriber`].
pub struct SpeechPipeline<A, T> {
    source: A,
    transcriber: T,
    listen_timeout: Duration,
}

impl<A: AudioSource, T: Transcriber> SpeechPipeline<A, T> {
    pub fn new(source: A, transcriber: T) -> Self {
        Self {
            source,
            transcriber,
            listen_timeout: DEFAULT_LISTEN_TIMEOUT,
        }
    }

    pub fn with_listen_timeout(mut self, timeout: Duration) -> Self {
        self.listen_timeout = timeout;
        self
    }
}

impl<A: AudioSource, T: Transcriber> SpeechCapture for SpeechPipeline<A, T> {
    async fn capture(&self) -> Result<String, SpeechError> {
        let clip = tokio::time::timeout(self.listen_timeout, self.source.record())
            .await
            .map_err(|_| SpeechError::TimedOut)??;
        debug!(bytes = clip.bytes.len(), file = %clip.file_name, "Audio clip captured");

        let text = self.transcriber.transcribe(clip).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechError::Unintelligible);
        }
        Ok(text.to_string())
    }
}
