//! HTTP/SSE host for Mindwell.
//!
//! Axum-based REST API at `/api/v1/` with an envelope response format, CORS,
//! and Server-Sent Events for streamed replies.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
