//! Id placeholder substitution.
//!
//! An empty element such as `<div id="header"></div>` is replaced, tags
//! included, by the contents of the partial configured for `header`. When
//! the partial is a full HTML document only the inside of its `<body>` is
//! used.
//!
//! Rules run in configured order against the current body, so a partial
//! injected for one id is scanned for the placeholders of later ids in the
//! same pass.

use regex::NoExpand;

use crate::config::MissingPartialPolicy;
use crate::content::document::Document;
use crate::content::loader::read_text;
use crate::content::rules::{IncludeIdRule, Rules};

/// Run one id placeholder pass.
pub fn resolve_include_ids(doc: Document, rules: &Rules) -> Document {
    if doc.is_failed() {
        return doc;
    }

    let mut body = doc.body;
    let mut error = None;

    for rule in rules.include_ids() {
        if !rule.matcher().is_match(&body) {
            continue;
        }
        if rules.missing_partial() == MissingPartialPolicy::Skip && !rules.file_exists(&rule.source) {
            tracing::debug!(id = %rule.id, source = %rule.source, "Partial missing, leaving placeholder");
            continue;
        }

        match read_text(rules, &rule.source) {
            Ok(text) => {
                let partial = body_content(rules, &text);
                body = rule.matcher().replace_all(&body, NoExpand(partial)).into_owned();
            }
            Err(e) => {
                tracing::warn!(id = %rule.id, error = %e, "Partial unreadable");
                error.get_or_insert(e);
            }
        }
    }

    Document { body, error }
}

/// Whether the body holds a placeholder that a pass would act on.
///
/// Under the skip policy, placeholders whose partial is missing do not count.
pub fn has_pending_placeholder(body: &str, rules: &Rules) -> bool {
    rules
        .include_ids()
        .iter()
        .any(|rule| rule.matcher().is_match(body) && is_actionable(rule, rules))
}

fn is_actionable(rule: &IncludeIdRule, rules: &Rules) -> bool {
    match rules.missing_partial() {
        MissingPartialPolicy::Skip => rules.file_exists(&rule.source),
        MissingPartialPolicy::Fail => true,
    }
}

fn body_content<'t>(rules: &Rules, text: &'t str) -> &'t str {
    rules
        .body_block()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(text, |m| m.as_str())
}
