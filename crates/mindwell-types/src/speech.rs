//! Speech capture types.

use serde::{Deserialize, Serialize};

/// A captured audio clip ready for transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// Raw encoded audio (usually a WAV container).
    pub bytes: Vec<u8>,
    /// File name sent to the transcription backend, e.g. `clip.wav`.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime_type: String,
}

/// Ways speech capture can fail.
///
/// These are surfaced to the user as text but are never treated as
/// conversation content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SpeechError {
    #[error("speech was unintelligible")]
    Unintelligible,

    #[error("speech service unreachable: {0}")]
    ServiceUnreachable(String),

    #[error("listening timed out")]
    TimedOut,
}

impl SpeechError {
    /// The message shown to the user in place of a transcript.
    pub fn user_message(&self) -> &'static str {
        match self {
            SpeechError::Unintelligible => "Sorry, I couldn't understand that.",
            SpeechError::ServiceUnreachable(_) => {
                "Could not request results, please check your connection."
            }
            SpeechError::TimedOut => "Listening timed out. Please try again.",
        }
    }
}
