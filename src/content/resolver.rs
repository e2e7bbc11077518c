//! Fixed-point resolution of HTML documents.
//!
//! # State Machine
//! ```text
//! Start ── load error ──────────────────────────────▶ Failed
//!   │
//!   ▼
//! rewrite ─▶ needs_replace ── (false, false) ───────▶ Converged
//!               ▲        │
//!               │        ▼
//!               │   include pass   (if pending)
//!               │   include-id pass (if pending)
//!               │   rewrite pass
//!               │        │── stage error ──────────▶ Failed
//!               │        │── pass limit reached ───▶ Failed
//!               └────────┘
//! ```
//!
//! # Design Decisions
//! - Only directives and placeholders whose target exists count as
//!   pending, so dead references cannot keep the loop alive
//! - Cyclic includes are cut off by `MaxPasses` instead of being detected
//! - The first stage error ends the loop; the partial body is kept

use crate::content::directive::{has_pending_directive, resolve_include_directives};
use crate::content::document::{Document, ResolveError};
use crate::content::include_id::{has_pending_placeholder, resolve_include_ids};
use crate::content::rewrite::rewrite;
use crate::content::rules::Rules;

/// Which kinds of substitution still have work to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pending {
    pub include: bool,
    pub include_id: bool,
}

impl Pending {
    pub fn any(&self) -> bool {
        self.include || self.include_id
    }
}

/// Outcome of running a document to its fixed point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub document: Document,
    /// Number of substitution passes that ran.
    pub passes: usize,
}

/// Compute the pending work for a document. Errored documents have none.
pub fn needs_replace(doc: &Document, rules: &Rules) -> Pending {
    if doc.is_failed() {
        return Pending::default();
    }
    Pending {
        include: has_pending_directive(&doc.body, rules),
        include_id: has_pending_placeholder(&doc.body, rules),
    }
}

/// Drive rewrite and substitution passes until nothing is pending.
pub fn resolve(doc: Document, rules: &Rules) -> Resolved {
    if doc.is_failed() {
        return Resolved { document: doc, passes: 0 };
    }

    let mut doc = rewrite(doc, rules);
    let mut pending = needs_replace(&doc, rules);
    let mut passes = 0;

    while pending.any() {
        if passes == rules.max_passes() {
            tracing::warn!(passes, "Resolution did not converge, possible include cycle");
            let document = doc.with_error(Some(ResolveError::PassLimit(passes)));
            return Resolved { document, passes };
        }
        passes += 1;

        if pending.include {
            doc = resolve_include_directives(doc, rules);
        }
        if pending.include_id {
            doc = resolve_include_ids(doc, rules);
        }
        doc = rewrite(doc, rules);

        pending = needs_replace(&doc, rules);
        tracing::trace!(
            pass = passes,
            include = pending.include,
            include_id = pending.include_id,
            "Resolution pass complete"
        );
    }

    if let Some(e) = &doc.error {
        tracing::debug!(passes, error = %e, "Resolution failed");
    } else {
        tracing::debug!(passes, "Resolution converged");
    }

    Resolved { document: doc, passes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, RuleEntry};
    use std::fs;
    use std::path::Path;

    fn config_at(root: &Path) -> Config {
        Config {
            root: root.display().to_string(),
            ..Config::default()
        }
    }

    fn include(path: &str) -> String {
        format!(r#"<!--#include virtual="{path}" -->"#)
    }

    /// One more full pass over a converged document.
    fn extra_pass(doc: Document, rules: &Rules) -> Document {
        let doc = resolve_include_directives(doc, rules);
        let doc = resolve_include_ids(doc, rules);
        rewrite(doc, rules)
    }

    #[test]
    fn test_nested_chain_reaches_fixed_point() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.inc"), format!("a[{}]", include("b.inc"))).unwrap();
        fs::write(dir.path().join("b.inc"), format!("b[{}]", include("c.inc"))).unwrap();
        fs::write(dir.path().join("c.inc"), "c").unwrap();
        let rules = Rules::from_config(&config_at(dir.path())).unwrap();

        let resolved = resolve(Document::ok(include("a.inc")), &rules);

        assert_eq!(resolved.document, Document::ok("a[b[c]]"));
        assert_eq!(resolved.passes, 3);
        assert_eq!(needs_replace(&resolved.document, &rules), Pending::default());
        assert_eq!(extra_pass(resolved.document.clone(), &rules), resolved.document);
    }

    #[test]
    fn test_directives_and_placeholders_interleave() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("head.inc"), r#"<div id="nav"></div>"#).unwrap();
        fs::write(
            dir.path().join("nav.html"),
            format!("<html><body><a href=\"/dev/x\">{}</a></body></html>", include("label.inc")),
        )
        .unwrap();
        fs::write(dir.path().join("label.inc"), "Home").unwrap();
        let rules = Rules::from_config(&Config {
            include_id: vec![RuleEntry::new("nav", "nav.html")],
            path: vec![RuleEntry::new("/dev/", "./")],
            ..config_at(dir.path())
        })
        .unwrap();

        let resolved = resolve(Document::ok(include("head.inc")), &rules);

        assert_eq!(resolved.document, Document::ok(r#"<a href="./x">Home</a>"#));
    }

    #[test]
    fn test_dead_directive_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.inc"), "ok").unwrap();
        let rules = Rules::from_config(&config_at(dir.path())).unwrap();

        let body = format!("{}|{}", include("missing.inc"), include("ok.inc"));
        let resolved = resolve(Document::ok(body), &rules);

        assert_eq!(
            resolved.document,
            Document::ok(format!("{}|ok", include("missing.inc")))
        );
        assert_eq!(resolved.passes, 1);
    }

    #[test]
    fn test_only_dead_directives_need_no_pass() {
        let dir = tempfile::tempdir().unwrap();
        let rules = Rules::from_config(&config_at(dir.path())).unwrap();

        let resolved = resolve(Document::ok(include("missing.inc")), &rules);
        assert_eq!(resolved.passes, 0);
        assert_eq!(resolved.document.body, include("missing.inc"));
    }

    #[test]
    fn test_cycle_hits_pass_limit() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.inc"), include("b.inc")).unwrap();
        fs::write(dir.path().join("b.inc"), include("a.inc")).unwrap();
        let rules = Rules::from_config(&Config {
            max_passes: 5,
            ..config_at(dir.path())
        })
        .unwrap();

        let resolved = resolve(Document::ok(include("a.inc")), &rules);

        assert_eq!(resolved.passes, 5);
        assert_eq!(resolved.document.error, Some(ResolveError::PassLimit(5)));
    }

    #[test]
    fn test_failed_document_is_returned_as_is() {
        let rules = Rules::from_config(&Config::default()).unwrap();
        let doc = Document::failed(ResolveError::Traversal("/..".into()));

        let resolved = resolve(doc.clone(), &rules);
        assert_eq!(resolved, Resolved { document: doc, passes: 0 });
    }
}
