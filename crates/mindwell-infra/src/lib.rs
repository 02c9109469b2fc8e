//! Infrastructure layer for Mindwell.
//!
//! Implements the ports defined in `mindwell-core`: generation backends
//! (Ollama, OpenAI-compatible servers), speech transcription over HTTP, and
//! file-backed audio clips. Also loads configuration and presentation assets.

pub mod assets;
pub mod config;
pub mod llm;
pub mod speech;
