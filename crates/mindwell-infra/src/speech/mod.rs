//! Speech capture implementations.
//!
//! [`WavFileSource`] stands in for a microphone by reading pre-recorded
//! clips, and [`HttpTranscriber`] sends clips to an OpenAI-compatible
//! transcription endpoint. Compose them with
//! [`mindwell_core::speech::SpeechPipeline`].

pub mod transcriber;
pub mod wav;

pub use transcriber::HttpTranscriber;
pub use wav::WavFileSource;
