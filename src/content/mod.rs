//! Content resolution subsystem.
//!
//! # Data Flow
//! ```text
//! request URI
//!     → loader.rs (index substitution, alternates, read)
//!     → Document
//!     → resolver.rs (HTML only: loop until fixed point)
//!         → rewrite.rs (literal path rules)
//!         → directive.rs (<!--#include --> markers)
//!         → include_id.rs (id placeholders)
//!     → Document (final body or error)
//!
//! Rule compilation (at startup):
//!     Config → rules.rs → Rules (immutable, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Stages are plain functions `Document -> Document`; no shared state
//! - Errors travel inside the document next to the partial body
//! - No caching: every request reads the files again

pub mod directive;
pub mod document;
pub mod include_id;
pub mod loader;
pub mod resolver;
pub mod rewrite;
pub mod rules;

pub use document::{Document, ResolveError};
pub use loader::FileLoader;
pub use resolver::{needs_replace, resolve, Pending, Resolved};
pub use rules::Rules;
