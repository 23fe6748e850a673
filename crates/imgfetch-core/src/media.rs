//! Image media policy: the MIME types and file extensions the fetcher accepts.
//!
//! These tables are fixed at compile time; only sizes and timeouts are configurable.

/// Largest body accepted, declared or streamed (50 MiB).
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// MIME types accepted from the `Content-Type` header.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/webp",
    "image/svg+xml",
];

/// Extensions (with leading dot, lowercase) a saved file may carry.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".svg"];

/// Extension used when the content type maps to nothing we know.
pub const FALLBACK_EXTENSION: &str = ".jpg";

/// Strips parameters (`; charset=...`) and surrounding whitespace, lowercased.
pub fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// True if the declared content type names one of the allowed image types.
///
/// Matching is a case-insensitive substring test on the essence, so
/// `image/png; charset=binary` and `IMAGE/PNG` are both accepted.
pub fn is_allowed_mime(content_type: &str) -> bool {
    let essence = mime_essence(content_type);
    if essence.is_empty() {
        return false;
    }
    ALLOWED_MIME_TYPES.iter().any(|m| essence.contains(m))
}

/// Maps a declared content type to a file extension, or `None` if it is not an image type we know.
pub fn extension_for_mime(content_type: &str) -> Option<&'static str> {
    match mime_essence(content_type).as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/gif" => Some(".gif"),
        "image/bmp" | "image/x-ms-bmp" => Some(".bmp"),
        "image/webp" => Some(".webp"),
        "image/svg+xml" => Some(".svg"),
        _ => None,
    }
}

/// Like [`extension_for_mime`] but never fails: unknown types get [`FALLBACK_EXTENSION`].
pub fn extension_or_fallback(content_type: &str) -> &'static str {
    extension_for_mime(content_type).unwrap_or(FALLBACK_EXTENSION)
}

/// Case-insensitive membership test; `ext` includes the leading dot.
pub fn is_allowed_extension(ext: &str) -> bool {
    let lower = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn essence_drops_parameters() {
        assert_eq!(mime_essence("Image/PNG; charset=binary"), "image/png");
        assert_eq!(mime_essence(""), "");
    }

    #[test]
    fn allowed_mime_types() {
        assert!(is_allowed_mime("image/png; charset=binary"));
        assert!(is_allowed_mime("IMAGE/JPEG"));
        assert!(is_allowed_mime("image/svg+xml"));
        assert!(!is_allowed_mime("text/html"));
        assert!(!is_allowed_mime("application/octet-stream"));
        assert!(!is_allowed_mime(""));
    }

    #[test]
    fn every_allowed_mime_maps_to_an_allowed_extension() {
        for m in ALLOWED_MIME_TYPES {
            let ext = extension_for_mime(m).expect("known image type");
            assert!(is_allowed_extension(ext), "{} -> {}", m, ext);
        }
    }

    #[test]
    fn unknown_types_fall_back_to_jpg() {
        assert_eq!(extension_or_fallback("text/html"), ".jpg");
        assert_eq!(extension_or_fallback(""), ".jpg");
        assert_eq!(extension_or_fallback("image/webp"), ".webp");
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_allowed_extension(".PNG"));
        assert!(is_allowed_extension(".jpeg"));
        assert!(!is_allowed_extension(".html"));
        assert!(!is_allowed_extension("png"));
    }
}
