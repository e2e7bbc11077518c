//! Local development server with server-side includes.
//!
//! Serves static files from disk and resolves, for HTML, include
//! directives and id placeholders until the document stops changing.

pub mod config;
pub mod content;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::Config;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
