//! Observability subsystem.
//!
//! Structured logging through `tracing`; request spans come from
//! `tower_http::trace::TraceLayer` and carry the `x-request-id`.

pub mod logging;

pub use logging::init_logging;
