//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! localchecker.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → Config (validated, immutable)
//!     → compiled into content::Rules, shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never reloaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{Config, MissingPartialPolicy, RuleEntry};
pub use validation::ValidationError;
