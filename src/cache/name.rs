//! Cache file naming

use crate::error::{LayeredError, LayeredResult};

/// Suffix of every cache file managed by this crate
pub const CACHE_SUFFIX: &str = "-layered.css";

/// Characters that never survive into a cache file name
const SPECIAL_CHARS: &[char] = &[
    '?', '[', ']', '/', '\\', '=', '<', '>', ':', ';', ',', '\'', '"', '&', '$', '#', '*', '(',
    ')', '|', '~', '`', '!', '{', '}', '%', '+',
];

/// Reduce a style handle to a filesystem-safe token.
///
/// Unsafe punctuation and control characters are dropped, whitespace runs
/// become a single `-`, and leading/trailing `.`, `-`, `_` are trimmed so
/// the result can never be a hidden file or a path component like `..`.
pub fn sanitize_file_name(handle: &str) -> String {
    let mut out = String::with_capacity(handle.len());
    let mut pending_dash = false;

    for c in handle.chars() {
        if c.is_whitespace() {
            pending_dash = true;
            continue;
        }
        if c.is_control() || SPECIAL_CHARS.contains(&c) {
            continue;
        }
        if pending_dash && !out.is_empty() {
            out.push('-');
        }
        pending_dash = false;
        out.push(c);
    }

    out.trim_matches(|c| matches!(c, '.' | '-' | '_')).to_string()
}

/// Cache file name for a handle: `<sanitized-handle>-layered.css`
pub fn cache_file_name(handle: &str) -> LayeredResult<String> {
    let token = sanitize_file_name(handle);
    if token.is_empty() {
        return Err(LayeredError::InvalidHandle(handle.to_string()));
    }
    Ok(format!("{token}{CACHE_SUFFIX}"))
}

/// Whether a directory entry is a cache file managed by this crate
pub fn is_cache_file_name(name: &str) -> bool {
    name.len() > CACHE_SUFFIX.len() && name.ends_with(CACHE_SUFFIX) && !name.starts_with('.')
}

/// Hidden staging name for a cache file being written by process `pid`
pub fn temp_file_name(cache_file: &str, pid: u32) -> String {
    format!(".{cache_file}.{pid}.tmp")
}

/// Whether a directory entry is a staging file left by [`temp_file_name`]
pub fn is_temp_file_name(name: &str) -> bool {
    let Some(inner) = name
        .strip_prefix('.')
        .and_then(|n| n.strip_suffix(".tmp"))
    else {
        return false;
    };

    match inner.rsplit_once('.') {
        Some((cache_file, pid)) => {
            is_cache_file_name(cache_file)
                && !pid.is_empty()
                && pid.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}
