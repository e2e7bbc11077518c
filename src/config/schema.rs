//! Configuration schema definitions.
//!
//! Keys are PascalCase to stay compatible with existing `localchecker.toml`
//! files:
//!
//! ```toml
//! Port = "8080"
//!
//! [[Path]]
//! K = "/assets/"
//! V = "./assets/"
//!
//! [[IncludeId]]
//! K = "header"
//! V = "partials/header.html"
//!
//! [[Alternate]]
//! K = "/old/"
//! V = "/new/"
//! ```

use serde::{Deserialize, Serialize};

/// Root configuration for the dev server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Listening port (all interfaces).
    #[serde(rename = "Port")]
    pub port: String,

    /// Literal find/replace pairs applied to served text.
    #[serde(rename = "Path")]
    pub path: Vec<RuleEntry>,

    /// Placeholder id to partial file pairs.
    #[serde(rename = "IncludeId")]
    pub include_id: Vec<RuleEntry>,

    /// Request-path substring to replacement pairs, first match wins.
    #[serde(rename = "Alternate")]
    pub alternate: Vec<RuleEntry>,

    /// Directory that every relative path is resolved against.
    #[serde(rename = "Root")]
    pub root: String,

    /// Upper bound on resolution passes per HTML document.
    #[serde(rename = "MaxPasses")]
    pub max_passes: usize,

    /// Wall-clock deadline for a single request, in seconds.
    #[serde(rename = "RequestTimeoutSecs")]
    pub request_timeout_secs: u64,

    /// What to do with a placeholder whose partial file is missing.
    #[serde(rename = "MissingIncludeId")]
    pub missing_include_id: MissingPartialPolicy,

    /// Default log filter when `RUST_LOG` is unset.
    #[serde(rename = "LogLevel")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: "8080".to_string(),
            path: Vec::new(),
            include_id: Vec::new(),
            alternate: Vec::new(),
            root: ".".to_string(),
            max_passes: 64,
            request_timeout_secs: 30,
            missing_include_id: MissingPartialPolicy::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Socket address the server binds to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// A single `K`/`V` row of one of the rule tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleEntry {
    #[serde(rename = "K")]
    pub key: String,

    #[serde(rename = "V")]
    pub value: String,
}

impl RuleEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Policy for id placeholders whose source file does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPartialPolicy {
    /// Leave the placeholder in place and stop counting it as pending work.
    #[default]
    Skip,
    /// Treat the placeholder as pending so the request fails with not-found.
    Fail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pascal_case_tables() {
        let raw = r#"
            Port = "3000"
            MissingIncludeId = "fail"

            [[Path]]
            K = "/old"
            V = "/new"

            [[IncludeId]]
            K = "header"
            V = "partial.html"
        "#;
        let config: Config = toml::from_str(raw).unwrap();

        assert_eq!(config.port, "3000");
        assert_eq!(config.path, vec![RuleEntry::new("/old", "/new")]);
        assert_eq!(config.include_id, vec![RuleEntry::new("header", "partial.html")]);
        assert!(config.alternate.is_empty());
        assert_eq!(config.missing_include_id, MissingPartialPolicy::Fail);
        // Untouched keys fall back to defaults
        assert_eq!(config.root, ".");
        assert_eq!(config.max_passes, 64);
    }

    #[test]
    fn test_bind_address() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
