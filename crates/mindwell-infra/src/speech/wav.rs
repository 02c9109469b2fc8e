//! Audio source backed by a WAV file on disk.

use std::path::PathBuf;

use mindwell_core::speech::AudioSource;
use mindwell_types::speech::{AudioClip, SpeechError};

/// Reads one pre-recorded clip per `record` call.
#[derive(Debug, Clone)]
pub struct WavFileSource {
    path: PathBuf,
}

impl WavFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AudioSource for WavFileSource {
    async fn record(&self) -> Result<AudioClip, SpeechError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                // Nothing to listen to: same outcome as a silent microphone.
                tracing::warn!("Cannot read audio clip {}: {err}", self.path.display());
                return Err(SpeechError::TimedOut);
            }
        };

        if !is_wav(&bytes) {
            tracing::debug!("{} is not a RIFF/WAVE file", self.path.display());
            return Err(SpeechError::Unintelligible);
        }

        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("clip.wav")
            .to_string();

        Ok(AudioClip {
            bytes,
            file_name,
            mime_type: "audio/wav".to_string(),
        })
    }
}

fn is_wav(bytes: &[u8]) -> bool {
    bytes.len() > 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}
