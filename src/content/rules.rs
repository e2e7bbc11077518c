//! Rule set compiled from configuration.
//!
//! # Design Decisions
//! - Every pattern is compiled once at startup; stages only borrow `&Rules`
//! - Immutable after construction (safe for concurrent readers)
//! - Relative paths are resolved against `root`, never against the
//!   process working directory directly

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::config::{Config, MissingPartialPolicy, RuleEntry};

/// `<!--#include TYPE="PATH" -->`, TYPE lowercase, PATH any non-whitespace.
const INCLUDE_DIRECTIVE: &str = r#"<!--#include ([a-z]+)="(\S+)" -->"#;

/// Inner content of a `<body>` block, greedy to the last closing tag.
const BODY_BLOCK: &str = r"(?s)<body>(.*)</body>";

/// A quoted attribute value, or any character that cannot end a tag.
const TAG_TOKEN: &str = r#"(?:"[^"]*"|'[^']*'|[^'">])"#;

/// A compiled placeholder rule: elements with `id=<id>` become `source`.
#[derive(Debug, Clone)]
pub struct IncludeIdRule {
    pub id: String,
    pub source: String,
    matcher: Regex,
}

impl IncludeIdRule {
    /// Compile the placeholder matcher for `id`.
    ///
    /// Matches an empty element pair whose opening tag carries the id among
    /// any other quoted attributes, in either quote style.
    pub fn new(id: &str, source: &str) -> Result<Self, regex::Error> {
        let id_escaped = regex::escape(id);
        let pattern = format!(
            r#"<{t}*\sid=(?:"{id}"|'{id}'){t}*></{t}*>"#,
            t = TAG_TOKEN,
            id = id_escaped,
        );
        Ok(Self {
            id: id.to_string(),
            source: source.to_string(),
            matcher: Regex::new(&pattern)?,
        })
    }

    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }
}

/// Everything the resolution stages need, compiled once.
#[derive(Debug, Clone)]
pub struct Rules {
    root: PathBuf,
    path_rules: Vec<RuleEntry>,
    alternates: Vec<RuleEntry>,
    include_ids: Vec<IncludeIdRule>,
    include_directive: Regex,
    body_block: Regex,
    missing_partial: MissingPartialPolicy,
    max_passes: usize,
}

impl Rules {
    /// Compile the rule tables of a validated configuration.
    pub fn from_config(config: &Config) -> Result<Self, regex::Error> {
        let include_ids = config
            .include_id
            .iter()
            .map(|rule| IncludeIdRule::new(&rule.key, &rule.value))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            root: PathBuf::from(&config.root),
            path_rules: config.path.clone(),
            alternates: config.alternate.clone(),
            include_ids,
            include_directive: Regex::new(INCLUDE_DIRECTIVE)?,
            body_block: Regex::new(BODY_BLOCK)?,
            missing_partial: config.missing_include_id,
            max_passes: config.max_passes,
        })
    }

    /// Resolve a configured or request-derived path against the root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// Whether `path` names an existing regular file under the root.
    pub fn file_exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_rules(&self) -> &[RuleEntry] {
        &self.path_rules
    }

    pub fn alternates(&self) -> &[RuleEntry] {
        &self.alternates
    }

    pub fn include_ids(&self) -> &[IncludeIdRule] {
        &self.include_ids
    }

    pub fn include_directive(&self) -> &Regex {
        &self.include_directive
    }

    pub fn body_block(&self) -> &Regex {
        &self.body_block
    }

    pub fn missing_partial(&self) -> MissingPartialPolicy {
        self.missing_partial
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }
}
