//! Observability setup for Mindwell: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;
