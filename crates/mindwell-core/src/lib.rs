//! Conversation session logic and port definitions for Mindwell.
//!
//! This crate defines the "ports" (provider, display, speech, sentiment
//! traits) that the infrastructure and application layers implement, plus the
//! session manager that drives a conversation turn by turn. It depends only on
//! `mindwell-types` -- never on `mindwell-infra` or any network crate.

pub mod chat;
pub mod display;
pub mod llm;
pub mod sentiment;
pub mod speech;
