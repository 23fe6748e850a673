//! URL validation and URL-derived filename hints.
//!
//! Validation is purely syntactic: no DNS lookups or connections happen here.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::{percent_decode, sanitize_filename};

use thiserror::Error;
use url::Url;

/// Why a candidate URL was refused before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlRejection {
    #[error("invalid URL format: {0}")]
    Malformed(String),
    #[error("only HTTP and HTTPS URLs are allowed (got scheme `{0}`)")]
    UnsupportedScheme(String),
    #[error("invalid URL format: missing host")]
    MissingHost,
}

/// Parses `url` and checks it is an absolute `http`/`https` URL with a non-empty host.
pub fn check_url(url: &str) -> Result<Url, UrlRejection> {
    let parsed = Url::parse(url).map_err(|e| UrlRejection::Malformed(e.to_string()))?;

    let scheme = parsed.scheme();
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return Err(UrlRejection::UnsupportedScheme(scheme.to_string()));
    }

    // The url crate normalizes `http:host` and `http:///host` into `http://host/`;
    // the raw text must carry the authority itself.
    match raw_authority(url) {
        Some(auth) if !auth.is_empty() => {}
        _ => return Err(UrlRejection::MissingHost),
    }
    match parsed.host_str() {
        Some(h) if !h.is_empty() => Ok(parsed),
        _ => Err(UrlRejection::MissingHost),
    }
}

/// Returns true if `url` may be fetched. Logs the reason on rejection.
pub fn validate_url(url: &str) -> bool {
    match check_url(url) {
        Ok(_) => true,
        Err(reason) => {
            tracing::warn!(url, %reason, "rejected URL");
            false
        }
    }
}

/// The text between `scheme://` and the next `/`, `?` or `#`; `None` without `//`.
fn raw_authority(url: &str) -> Option<&str> {
    let (_, rest) = url.trim().split_once(':')?;
    let rest = rest.strip_prefix("//")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_url("https://example.com/image.jpg"));
        assert!(validate_url("http://example.com"));
        assert!(validate_url("HTTPS://EXAMPLE.COM/a.png"));
        assert!(validate_url("http://127.0.0.1:8080/x?y=1"));
    }

    #[test]
    fn rejects_other_schemes() {
        for url in [
            "ftp://invalid.com/image.jpg",
            "file:///etc/passwd",
            "data:image/png;base64,AAAA",
            "javascript:alert(1)",
            "mailto:someone@example.com",
            "ws://example.com/socket",
        ] {
            assert!(!validate_url(url), "{}", url);
            assert!(matches!(
                check_url(url),
                Err(UrlRejection::UnsupportedScheme(_)) | Err(UrlRejection::Malformed(_))
            ));
        }
        assert_eq!(
            check_url("ftp://invalid.com/image.jpg"),
            Err(UrlRejection::UnsupportedScheme("ftp".into()))
        );
    }

    #[test]
    fn rejects_unparseable() {
        assert!(matches!(check_url("not-a-url"), Err(UrlRejection::Malformed(_))));
        assert!(!validate_url(""));
        assert!(!validate_url("://example.com"));
    }

    #[test]
    fn rejects_empty_authority() {
        for url in [
            "http://",
            "https:///image.png",
            "http:example.com/image.png",
            "http://?q=1",
            "ftp:///file",
        ] {
            assert!(!validate_url(url), "{}", url);
        }
        assert_eq!(check_url("https:///image.png"), Err(UrlRejection::MissingHost));
    }

    #[test]
    fn raw_authority_extraction() {
        assert_eq!(raw_authority("http://a.b/c"), Some("a.b"));
        assert_eq!(raw_authority("http://a.b?x"), Some("a.b"));
        assert_eq!(raw_authority("http:///c"), Some(""));
        assert_eq!(raw_authority("http:a.b"), None);
    }
}
