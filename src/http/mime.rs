//! Extension-based content types.
//!
//! The category decides how a file is processed before it is sent:
//! HTML is resolved to a fixed point, assets get one rewrite pass and
//! everything else is passed through byte for byte.

use std::path::Path;

/// Processing strategy for a served file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Html,
    Asset,
    Other,
}

/// Content type and category derived from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mime {
    pub content_type: &'static str,
    pub category: Category,
}

impl Mime {
    /// Look up the type for a request path.
    pub fn for_path(path: &str) -> Self {
        let ext = Path::new(path)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let (content_type, category) = match ext.as_str() {
            "html" | "htm" => ("text/html", Category::Html),
            "css" => ("text/css", Category::Asset),
            "js" => ("application/javascript", Category::Asset),
            "json" => ("application/json", Category::Asset),
            other => (passthrough_type(other), Category::Other),
        };
        Self {
            content_type,
            category,
        }
    }

    /// Value for the `Content-Type` header.
    pub fn header_value(&self) -> String {
        match self.category {
            Category::Other => self.content_type.to_string(),
            Category::Html | Category::Asset => format!("{}; charset=utf-8", self.content_type),
        }
    }
}

fn passthrough_type(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "txt" => "text/plain",
        "xml" => "text/xml",
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    }
}
