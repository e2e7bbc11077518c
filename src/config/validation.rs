//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject rules with an empty key (an empty pattern matches everywhere)
//! - Validate value ranges (port, pass limit, timeout)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Config → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{Config, RuleEntry};

/// A single semantic problem in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{table} rule #{index} has an empty K")]
    EmptyKey { table: &'static str, index: usize },

    #[error("Port {0:?} is not a valid TCP port")]
    InvalidPort(String),

    #[error("MaxPasses must be greater than zero")]
    ZeroMaxPasses,

    #[error("RequestTimeoutSecs must be greater than zero")]
    ZeroTimeout,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.port.parse::<u16>().is_err() {
        errors.push(ValidationError::InvalidPort(config.port.clone()));
    }

    check_keys("Path", &config.path, &mut errors);
    check_keys("IncludeId", &config.include_id, &mut errors);
    check_keys("Alternate", &config.alternate, &mut errors);

    if config.max_passes == 0 {
        errors.push(ValidationError::ZeroMaxPasses);
    }
    if config.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_keys(table: &'static str, rules: &[RuleEntry], errors: &mut Vec<ValidationError>) {
    for (index, rule) in rules.iter().enumerate() {
        if rule.key.is_empty() {
            errors.push(ValidationError::EmptyKey { table, index });
        }
    }
}
