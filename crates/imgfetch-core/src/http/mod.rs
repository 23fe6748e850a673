//! HTTP collaborator: a GET that reports status and headers once, then streams the body.
//!
//! The pipeline only sees [`HttpClient`]; [`CurlClient`] is the libcurl-backed implementation.
//! Redirects, TLS, and connection reuse are the client's business.

mod curl_client;
mod parse;

pub use curl_client::CurlClient;
pub use parse::parse_header_lines;

use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Response metadata as declared by the server. Header names in `raw_headers` are lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
    /// `Content-Type` value, empty when absent.
    pub content_type: String,
    /// `Content-Length`, when present and numeric.
    pub content_length: Option<u64>,
    pub raw_headers: BTreeMap<String, String>,
}

impl ResponseMetadata {
    /// Builds metadata from `(name, value)` pairs; later duplicates win.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut raw_headers = BTreeMap::new();
        for (name, value) in pairs {
            raw_headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
        let content_type = raw_headers.get("content-type").cloned().unwrap_or_default();
        let content_length = raw_headers
            .get("content-length")
            .and_then(|v| v.parse::<u64>().ok());
        Self {
            content_type,
            content_length,
            raw_headers,
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.raw_headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// A single GET request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    /// Applies to connecting and to a stalled body; a slow but moving transfer is not cut off.
    pub timeout: Duration,
    pub headers: Vec<(String, String)>,
    /// Preferred size of each body chunk handed to [`ResponseHandler::on_chunk`].
    pub buffer_size: usize,
}

/// Returned by handler callbacks to keep the transfer going or stop it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Abort,
}

/// Receives one response. `on_head` is called exactly once before any `on_chunk`,
/// including for responses with an empty body.
pub trait ResponseHandler {
    fn on_head(&mut self, status: u32, meta: &ResponseMetadata) -> Flow;
    fn on_chunk(&mut self, chunk: &[u8]) -> Flow;
}

/// Failure to obtain a response at all. A non-2xx status is a response, not a transport error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection timed out: {0}")]
    Timeout(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("transfer failed: {0}")]
    Other(String),
}

pub trait HttpClient {
    /// Performs a GET, driving `handler`. Returns `Ok(())` also when the handler aborted.
    fn get(
        &self,
        request: &HttpRequest,
        handler: &mut dyn ResponseHandler,
    ) -> Result<(), TransportError>;
}

impl<T: HttpClient + ?Sized> HttpClient for &T {
    fn get(
        &self,
        request: &HttpRequest,
        handler: &mut dyn ResponseHandler,
    ) -> Result<(), TransportError> {
        (**self).get(request, handler)
    }
}
