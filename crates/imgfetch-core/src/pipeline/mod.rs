//! Single-URL fetch pipeline.
//!
//! validate → GET → stream under the content guard → dedup → name → write.
//! Every failure is returned as a [`FetchOutcome::Failure`]; nothing here panics or
//! propagates errors to the batch.

mod outcome;
mod stream;

#[cfg(test)]
pub(crate) mod testing;

pub use outcome::{FailureKind, FetchOutcome, FetchRequest};

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{FetchConfig, REQUEST_TIMEOUT};
use crate::dedup::DedupIndex;
use crate::guard::ContentGuard;
use crate::http::{HttpClient, HttpRequest};
use crate::naming;
use crate::storage::Filesystem;
use crate::url_model;
use stream::{BodyCollector, Stop};

/// Exclusive-create attempts before giving up on finding a free name.
const MAX_NAME_ATTEMPTS: usize = 8;

/// Fetches one URL at a time into `target_dir`.
pub struct FetchPipeline<C, F> {
    client: C,
    fs: F,
    target_dir: PathBuf,
    guard: ContentGuard,
    timeout: Duration,
    user_agent: String,
    chunk_size: usize,
}

impl<C: HttpClient, F: Filesystem> FetchPipeline<C, F> {
    /// Builds a pipeline writing into `cfg.output_dir`, capped at `media::MAX_FILE_SIZE`
    /// with [`REQUEST_TIMEOUT`].
    pub fn new(client: C, fs: F, cfg: &FetchConfig) -> Self {
        Self {
            client,
            fs,
            target_dir: cfg.output_dir.clone(),
            guard: ContentGuard::default(),
            timeout: REQUEST_TIMEOUT,
            user_agent: cfg.user_agent.clone(),
            chunk_size: cfg.buffer_size(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_max_file_size(mut self, max: u64) -> Self {
        self.guard = ContentGuard::new(max);
        self
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Creates the target directory. Call once before the first fetch.
    pub fn prepare(&self) -> io::Result<()> {
        self.fs.ensure_directory(&self.target_dir)
    }

    /// Runs the pipeline for one request. `index` is updated when the content is new.
    pub fn fetch_one(&self, request: &FetchRequest, index: &mut DedupIndex) -> FetchOutcome {
        let span = tracing::info_span!("fetch", url = %request.url);
        let _enter = span.enter();

        if let Err(reason) = url_model::check_url(&request.url) {
            tracing::warn!(%reason, "rejected URL");
            return FetchOutcome::failure(FailureKind::InvalidUrl, reason.to_string());
        }

        let mut collector = BodyCollector::new(self.guard);
        let transfer = self.client.get(&self.http_request(&request.url), &mut collector);

        match collector.stop_reason() {
            Some(Stop::Status(code)) => {
                tracing::warn!(status = code, "non-success response");
                return FetchOutcome::failure(FailureKind::HttpStatus, format!("HTTP {}", code));
            }
            Some(Stop::Guard(violation)) => {
                tracing::warn!(%violation, "content rejected");
                let kind = if violation.is_too_large() {
                    FailureKind::TooLarge
                } else {
                    FailureKind::UnsupportedType
                };
                return FetchOutcome::failure(kind, violation.to_string());
            }
            None => {}
        }
        if let Err(e) = transfer {
            tracing::warn!(error = %e, "transfer failed");
            return FetchOutcome::failure(FailureKind::Network, e.to_string());
        }
        if collector.status().is_none() {
            return FetchOutcome::failure(FailureKind::Network, "no response received");
        }

        let (content_type, body) = collector.into_parts();
        if index.observe(&body) {
            tracing::info!(bytes = body.len(), "already fetched in this batch");
            return FetchOutcome::Duplicate;
        }

        self.persist(&request.url, &content_type, &body)
    }

    fn http_request(&self, url: &str) -> HttpRequest {
        HttpRequest {
            url: url.to_string(),
            timeout: self.timeout,
            headers: vec![
                ("User-Agent".to_string(), self.user_agent.clone()),
                ("Accept".to_string(), "image/*".to_string()),
            ],
            buffer_size: self.chunk_size,
        }
    }

    /// Resolves a free name and creates the file exclusively; a name taken between the
    /// probe and the create is resolved again.
    fn persist(&self, url: &str, content_type: &str, body: &[u8]) -> FetchOutcome {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = naming::resolve(url, content_type, |candidate| {
                self.fs.exists(&self.target_dir.join(candidate))
            });
            let path = self.target_dir.join(&name);
            match self.fs.write_new(&path, body) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), bytes = body.len(), "saved");
                    return FetchOutcome::Success {
                        path,
                        size_bytes: body.len() as u64,
                    };
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::debug!(path = %path.display(), "name taken at create time, retrying");
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "write failed");
                    return FetchOutcome::failure(
                        FailureKind::Io,
                        format!("failed to write {}: {}", path.display(), e),
                    );
                }
            }
        }
        FetchOutcome::failure(
            FailureKind::Io,
            format!(
                "no free filename in {} after {} attempts",
                self.target_dir.display(),
                MAX_NAME_ATTEMPTS
            ),
        )
    }
}
