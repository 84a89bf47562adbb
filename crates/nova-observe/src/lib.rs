//! Observability set-up for Nova: the tracing subscriber and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
