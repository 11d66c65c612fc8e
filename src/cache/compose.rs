//! Layered stylesheet composition
//!
//! The output is a comment header followed by the source bytes, untouched,
//! inside a single `@layer` block. Nothing in the source is parsed or
//! escaped; only the header fields are defused so they cannot close the
//! comment.

use chrono::NaiveDateTime;

/// Fields recorded in the comment header of a cache file
#[derive(Debug, Clone)]
pub struct LayeredHeader<'a> {
    /// Original style handle
    pub handle: &'a str,
    /// Local time the file was generated
    pub generated: NaiveDateTime,
    /// Base name of the source file
    pub source_name: &'a str,
}

/// Wrap `css` in `@layer <layer_name> { ... }` below a comment header.
pub fn compose_layered(header: &LayeredHeader<'_>, layer_name: &str, css: &[u8]) -> Vec<u8> {
    let prefix = format!(
        "/**\n * Layered stylesheet for: {}\n * Generated: {}\n * Source: {}\n */\n\n@layer {} {{\n",
        comment_safe(header.handle),
        header.generated.format("%Y-%m-%d %H:%M:%S"),
        comment_safe(header.source_name),
        layer_name,
    );
    let suffix = b"\n}\n";

    let mut out = Vec::with_capacity(prefix.len() + css.len() + suffix.len());
    out.extend_from_slice(prefix.as_bytes());
    out.extend_from_slice(css);
    out.extend_from_slice(suffix);
    out
}

/// Break up `*/` and line breaks so a value stays inside its header line
fn comment_safe(value: &str) -> String {
    value
        .replace("*/", "* /")
        .replace(['\r', '\n'], " ")
}
