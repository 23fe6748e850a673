//! Filename extraction from URL path.

use super::sanitize::{percent_decode, sanitize_filename};

/// Returns the final component of the URL path, percent-decoded and sanitized.
///
/// Unlike "last non-empty segment", a path ending in `/` yields `None`: `https://x/dir/`
/// names a directory listing, not a file. Returns `None` for unparseable URLs too.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let last = parsed.path().rsplit('/').next()?;
    if last.is_empty() {
        return None;
    }
    let name = sanitize_filename(&percent_decode(last));
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
