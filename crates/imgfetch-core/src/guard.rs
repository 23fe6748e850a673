//! Content policy checks applied to a response before and while its body streams.

use thiserror::Error;

use crate::http::ResponseMetadata;
use crate::media::{self, MAX_FILE_SIZE};

/// A response that must not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardViolation {
    #[error("unsupported content type: `{0}`")]
    UnsupportedType(String),
    #[error("file too large: declared {size} bytes (max: {max})")]
    DeclaredTooLarge { size: u64, max: u64 },
    #[error("file too large during download: exceeded {max} bytes")]
    StreamTooLarge { max: u64 },
}

impl GuardViolation {
    pub fn is_too_large(&self) -> bool {
        matches!(
            self,
            GuardViolation::DeclaredTooLarge { .. } | GuardViolation::StreamTooLarge { .. }
        )
    }
}

/// Enforces the image type allow-list and the size cap.
#[derive(Debug, Clone, Copy)]
pub struct ContentGuard {
    max_size: u64,
}

impl Default for ContentGuard {
    fn default() -> Self {
        Self::new(MAX_FILE_SIZE)
    }
}

impl ContentGuard {
    pub fn new(max_size: u64) -> Self {
        Self { max_size }
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Checks declared metadata before any body byte is read.
    pub fn check_headers(&self, meta: &ResponseMetadata) -> Result<(), GuardViolation> {
        if !media::is_allowed_mime(&meta.content_type) {
            return Err(GuardViolation::UnsupportedType(meta.content_type.clone()));
        }
        if let Some(size) = meta.content_length {
            if size > self.max_size {
                return Err(GuardViolation::DeclaredTooLarge {
                    size,
                    max: self.max_size,
                });
            }
        }
        if meta.header("x-frame-options").is_some() {
            tracing::info!("security headers detected: source sends X-Frame-Options");
        }
        Ok(())
    }

    /// Checks the running body size; call with the size the buffer would have after a chunk.
    pub fn check_running_size(&self, bytes_so_far: u64) -> Result<(), GuardViolation> {
        if bytes_so_far > self.max_size {
            Err(GuardViolation::StreamTooLarge { max: self.max_size })
        } else {
            Ok(())
        }
    }
}
