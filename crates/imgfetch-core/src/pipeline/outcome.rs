//! Per-URL input and result types.

use std::fmt;
use std::path::PathBuf;

/// One URL to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Where in the pipeline a fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Malformed URL, or scheme/host not allowed.
    InvalidUrl,
    /// Timeout, connection refused, DNS failure.
    Network,
    /// Non-2xx response.
    HttpStatus,
    /// Content type outside the image allow-list.
    UnsupportedType,
    /// Declared or streamed size over the cap.
    TooLarge,
    /// Local directory or file write failure.
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::InvalidUrl => "invalid URL",
            FailureKind::Network => "network error",
            FailureKind::HttpStatus => "HTTP error",
            FailureKind::UnsupportedType => "unsupported type",
            FailureKind::TooLarge => "too large",
            FailureKind::Io => "I/O error",
        };
        f.write_str(s)
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Content was new and is now stored at `path`.
    Success { path: PathBuf, size_bytes: u64 },
    /// Same bytes were already fetched in this batch; nothing written.
    Duplicate,
    Failure { kind: FailureKind, message: String },
}

impl FetchOutcome {
    pub(crate) fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        FetchOutcome::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            FetchOutcome::Failure { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
