//! File loading for request paths.
//!
//! # Responsibilities
//! - Map a request URI to a file under the served root
//! - Substitute `index.html` for directory requests
//! - Apply the first matching alternate rule to the target path
//! - Read the file, reporting every failure uniformly as not-found

use std::fs;

use crate::content::document::{Document, ResolveError};
use crate::content::rules::Rules;

const INDEX_FILE: &str = "index.html";

/// Loads request targets from disk. Holds no state besides the rules.
#[derive(Debug, Clone, Copy)]
pub struct FileLoader<'a> {
    rules: &'a Rules,
}

impl<'a> FileLoader<'a> {
    pub fn new(rules: &'a Rules) -> Self {
        Self { rules }
    }

    /// Normalize a request URI path, substituting the directory index.
    ///
    /// `/` and any path ending in `/` get `index.html` appended; a path
    /// naming an existing directory gets `/index.html` appended.
    pub fn request_path(&self, uri: &str) -> Result<String, ResolveError> {
        if uri.split('/').any(|segment| segment == "..") {
            return Err(ResolveError::Traversal(uri.to_string()));
        }

        let path = if uri.is_empty() {
            format!("/{INDEX_FILE}")
        } else if uri.ends_with('/') {
            format!("{uri}{INDEX_FILE}")
        } else if self.rules.resolve(&format!(".{uri}")).is_dir() {
            format!("{uri}/{INDEX_FILE}")
        } else {
            uri.to_string()
        };
        Ok(path)
    }

    /// The relative file path a request path is served from, after the
    /// first matching alternate rule has been applied once.
    pub fn target(&self, request_path: &str) -> String {
        let target = format!(".{request_path}");

        match self
            .rules
            .alternates()
            .iter()
            .find(|rule| target.contains(&rule.key))
        {
            Some(rule) => {
                tracing::trace!(from = %target, pattern = %rule.key, "Alternate rule applied");
                target.replacen(&rule.key, &rule.value, 1)
            }
            None => target,
        }
    }

    /// Read the raw bytes behind a request URI.
    pub fn load_bytes(&self, uri: &str) -> Result<Vec<u8>, ResolveError> {
        let target = self.target(&self.request_path(uri)?);
        let path = self.rules.resolve(&target);

        fs::read(&path).map_err(|e| ResolveError::read(path, &e))
    }

    /// Read a request URI as a text document.
    pub fn load(&self, uri: &str) -> Document {
        match self.load_bytes(uri) {
            Ok(bytes) => Document::ok(decode(bytes)),
            Err(e) => Document::failed(e),
        }
    }
}

/// Read a file referenced from inside a document, relative to the root.
pub(crate) fn read_text(rules: &Rules, path: &str) -> Result<String, ResolveError> {
    let full = rules.resolve(path);
    fs::read(&full)
        .map(decode)
        .map_err(|e| ResolveError::read(full, &e))
}

fn decode(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
