//! Include directive substitution.
//!
//! # Responsibilities
//! - Find `<!--#include TYPE="PATH" -->` markers in a body
//! - Read each distinct PATH once per pass
//! - Splice file contents in place of every marker naming that PATH
//!
//! # Design Decisions
//! - Single scan over the pass-start body: text spliced in by this pass is
//!   never rescanned until the next pass
//! - Markers whose target does not exist stay verbatim and are not errors
//! - A read failure on an existing target is recorded on the document but
//!   does not stop the other markers of the pass

use std::collections::HashMap;

use regex::Captures;

use crate::content::document::Document;
use crate::content::loader::read_text;
use crate::content::rules::Rules;

/// Run one include-directive pass.
pub fn resolve_include_directives(doc: Document, rules: &Rules) -> Document {
    if doc.is_failed() {
        return doc;
    }

    let directive = rules.include_directive();
    let mut contents: HashMap<String, Option<String>> = HashMap::new();
    let mut error = None;

    for caps in directive.captures_iter(&doc.body) {
        let Some(path) = caps.get(2).map(|m| m.as_str()) else {
            continue;
        };
        if contents.contains_key(path) {
            continue;
        }

        let text = if !rules.file_exists(path) {
            tracing::debug!(path = %path, "Include target missing, leaving directive");
            None
        } else {
            match read_text(rules, path) {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Include target unreadable");
                    error.get_or_insert(e);
                    None
                }
            }
        };
        contents.insert(path.to_string(), text);
    }

    if contents.values().all(Option::is_none) {
        return doc.with_error(error);
    }

    let body = directive
        .replace_all(&doc.body, |caps: &Captures| match contents.get(&caps[2]) {
            Some(Some(text)) => text.clone(),
            _ => caps[0].to_string(),
        })
        .into_owned();

    Document { body, error }
}

/// Whether the body holds a directive whose target exists.
pub fn has_pending_directive(body: &str, rules: &Rules) -> bool {
    rules
        .include_directive()
        .captures_iter(body)
        .filter_map(|caps| caps.get(2))
        .any(|path| rules.file_exists(path.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use std::path::Path;

    fn rules_at(root: &Path) -> Rules {
        Rules::from_config(&Config {
            root: root.display().to_string(),
            ..Config::default()
        })
        .unwrap()
    }

    #[test]
    fn test_replaces_every_occurrence_of_a_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("nav.inc"), "<nav/>").unwrap();
        let rules = rules_at(dir.path());

        let body = r#"<!--#include virtual="nav.inc" -->|<!--#include file="nav.inc" -->"#;
        let doc = resolve_include_directives(Document::ok(body), &rules);

        assert_eq!(doc, Document::ok("<nav/>|<nav/>"));
    }

    #[test]
    fn test_spliced_directives_wait_for_next_pass() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("outer.inc"), r#"[<!--#include virtual="inner.inc" -->]"#).unwrap();
        fs::write(dir.path().join("inner.inc"), "inner").unwrap();
        let rules = rules_at(dir.path());

        let first = resolve_include_directives(
            Document::ok(r#"<!--#include virtual="outer.inc" -->"#),
            &rules,
        );
        assert_eq!(first.body, r#"[<!--#include virtual="inner.inc" -->]"#);
        assert!(has_pending_directive(&first.body, &rules));

        let second = resolve_include_directives(first, &rules);
        assert_eq!(second.body, "[inner]");
        assert!(!has_pending_directive(&second.body, &rules));
    }

    #[test]
    fn test_missing_target_is_left_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.inc"), "A").unwrap();
        let rules = rules_at(dir.path());

        let body = r#"<!--#include virtual="gone.inc" --><!--#include virtual="a.inc" -->"#;
        let doc = resolve_include_directives(Document::ok(body), &rules);

        assert_eq!(doc, Document::ok(r#"<!--#include virtual="gone.inc" -->A"#));
        assert!(!has_pending_directive(&doc.body, &rules));
    }

    #[test]
    fn test_contents_are_not_expanded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("price.inc"), "$1 and ${2}").unwrap();
        let rules = rules_at(dir.path());

        let doc = resolve_include_directives(
            Document::ok(r#"<!--#include virtual="price.inc" -->"#),
            &rules,
        );
        assert_eq!(doc.body, "$1 and ${2}");
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_target_keeps_other_substitutions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.inc"), "OK").unwrap();
        let locked = dir.path().join("locked.inc");
        fs::write(&locked, "secret").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read(&locked).is_ok() {
            // Running as root, permissions are not enforced
            return;
        }
        let rules = rules_at(dir.path());

        let body = r#"<!--#include virtual="ok.inc" -->,<!--#include virtual="locked.inc" -->"#;
        let doc = resolve_include_directives(Document::ok(body), &rules);

        assert_eq!(doc.body, r#"OK,<!--#include virtual="locked.inc" -->"#);
        assert!(doc.is_failed());
    }
}
