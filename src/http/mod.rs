//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, tracing)
//!     → mime.rs (extension → content type + category)
//!     → content pipeline (blocking pool)
//!     → 200 with resolved body, or 404 "file not found"
//! ```

pub mod mime;
pub mod server;

pub use mime::{Category, Mime};
pub use server::HttpServer;
