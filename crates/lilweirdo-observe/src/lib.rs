//! Observability setup for Lil Weirdo: structured logging with an optional
//! OpenTelemetry span bridge.

pub mod tracing_setup;
