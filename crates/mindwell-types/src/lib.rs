//! Shared domain types for Mindwell.
//!
//! This crate contains the domain types used across the Mindwell workspace:
//! conversation turns, generation requests and stream events, speech errors,
//! wellness content, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod speech;
pub mod wellness;
