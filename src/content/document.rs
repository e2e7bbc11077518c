//! Document values passed between resolution stages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can terminate content resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A requested or included file could not be read.
    #[error("cannot read {}: {kind}", path.display())]
    NotFound { path: PathBuf, kind: io::ErrorKind },

    /// The document did not reach a fixed point within the pass limit.
    #[error("resolution did not converge after {0} passes")]
    PassLimit(usize),

    /// The request path tried to leave the served root.
    #[error("request path {0:?} escapes the served root")]
    Traversal(String),
}

impl ResolveError {
    pub(crate) fn read(path: impl Into<PathBuf>, err: &io::Error) -> Self {
        Self::NotFound {
            path: path.into(),
            kind: err.kind(),
        }
    }
}

/// A text body together with the first error any stage reported for it.
///
/// Stages never mutate a document in place; each returns a new value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub body: String,
    pub error: Option<ResolveError>,
}

impl Document {
    /// A document with no error.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            error: None,
        }
    }

    /// An empty document carrying an error.
    pub fn failed(error: ResolveError) -> Self {
        Self {
            body: String::new(),
            error: Some(error),
        }
    }

    /// Replace the body, keeping the current error.
    pub fn with_body(self, body: String) -> Self {
        Self { body, ..self }
    }

    /// Record an error unless one is already present.
    pub fn with_error(self, error: Option<ResolveError>) -> Self {
        Self {
            error: self.error.or(error),
            ..self
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// The final body, or the error that terminated resolution.
    pub fn into_result(self) -> Result<String, ResolveError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.body),
        }
    }
}
