//! Literal path rewriting.
//!
//! Rules run in configured order against the output of the previous rule,
//! so a later rule sees text inserted by an earlier one in the same pass.

use crate::content::document::Document;
use crate::content::rules::Rules;

/// Apply every path rule once, globally and literally.
///
/// Errored documents pass through untouched.
pub fn rewrite(doc: Document, rules: &Rules) -> Document {
    if doc.is_failed() || rules.path_rules().is_empty() {
        return doc;
    }

    let mut body = doc.body;
    for rule in rules.path_rules() {
        if body.contains(&rule.key) {
            body = body.replace(&rule.key, &rule.value);
        }
    }

    Document { body, error: doc.error }
}
