//! In-memory collaborators for pipeline and batch tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use crate::http::{
    Flow, HttpClient, HttpRequest, ResponseHandler, ResponseMetadata, TransportError,
};
use crate::storage::{Filesystem, LocalFs};

enum Reply {
    Respond {
        status: u32,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    },
    /// Body of zeros that never ends on its own; stops at `limit` as a safety net.
    Endless {
        content_type: String,
        limit: u64,
    },
    Fail(TransportError),
}

/// Serves canned replies keyed by exact URL and records what was asked and delivered.
pub(crate) struct ScriptedClient {
    replies: HashMap<String, Reply>,
    chunk: usize,
    delivered: Cell<u64>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedClient {
    pub(crate) fn new() -> Self {
        Self {
            replies: HashMap::new(),
            chunk: 8192,
            delivered: Cell::new(0),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn chunk_size(mut self, chunk: usize) -> Self {
        self.chunk = chunk.max(1);
        self
    }

    /// Replies with `status`, the given headers and body; `Content-Length` is not added
    /// implicitly.
    pub(crate) fn respond(
        mut self,
        url: &str,
        status: u32,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Self {
        let headers = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.replies.insert(
            url.to_string(),
            Reply::Respond {
                status,
                headers,
                body: body.to_vec(),
            },
        );
        self
    }

    pub(crate) fn image(self, url: &str, content_type: &str, body: &[u8]) -> Self {
        let len = body.len().to_string();
        self.respond(
            url,
            200,
            &[("Content-Type", content_type), ("Content-Length", len.as_str())],
            body,
        )
    }

    pub(crate) fn status(self, url: &str, status: u32) -> Self {
        self.respond(url, status, &[("Content-Type", "text/html")], b"<h1>nope</h1>")
    }

    pub(crate) fn endless(mut self, url: &str, content_type: &str, limit: u64) -> Self {
        self.replies.insert(
            url.to_string(),
            Reply::Endless {
                content_type: content_type.to_string(),
                limit,
            },
        );
        self
    }

    pub(crate) fn fail(mut self, url: &str, err: TransportError) -> Self {
        self.replies.insert(url.to_string(), Reply::Fail(err));
        self
    }

    /// Body bytes handed to the handler so far, across all requests.
    pub(crate) fn delivered(&self) -> u64 {
        self.delivered.get()
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    fn deliver(&self, handler: &mut dyn ResponseHandler, chunk: &[u8]) -> Flow {
        self.delivered.set(self.delivered.get() + chunk.len() as u64);
        handler.on_chunk(chunk)
    }
}

impl HttpClient for ScriptedClient {
    fn get(
        &self,
        request: &HttpRequest,
        handler: &mut dyn ResponseHandler,
    ) -> Result<(), TransportError> {
        self.requests.borrow_mut().push(request.clone());
        match self.replies.get(&request.url) {
            None => Err(TransportError::Connect(format!(
                "could not resolve host for {}",
                request.url
            ))),
            Some(Reply::Fail(e)) => Err(e.clone()),
            Some(Reply::Respond {
                status,
                headers,
                body,
            }) => {
                let meta = ResponseMetadata::from_pairs(
                    headers.iter().map(|(k, v)| (k.as_str(), v.as_str())),
                );
                if handler.on_head(*status, &meta) == Flow::Abort {
                    return Ok(());
                }
                for piece in body.chunks(self.chunk) {
                    if self.deliver(handler, piece) == Flow::Abort {
                        return Ok(());
                    }
                }
                Ok(())
            }
            Some(Reply::Endless {
                content_type,
                limit,
            }) => {
                let meta = ResponseMetadata::from_pairs([("Content-Type", content_type.as_str())]);
                if handler.on_head(200, &meta) == Flow::Abort {
                    return Ok(());
                }
                let piece = vec![0u8; self.chunk];
                let mut sent = 0u64;
                while sent < *limit {
                    sent += piece.len() as u64;
                    if self.deliver(handler, &piece) == Flow::Abort {
                        return Ok(());
                    }
                }
                Ok(())
            }
        }
    }
}

/// Directory always creatable, nothing exists, every write fails.
pub(crate) struct ReadOnlyFs;

impl Filesystem for ReadOnlyFs {
    fn ensure_directory(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn exists(&self, _path: &Path) -> bool {
        false
    }

    fn write_new(&self, _path: &Path, _bytes: &[u8]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only filesystem"))
    }
}

/// Local disk whose existence probe answers "free" once per path even when the file is
/// there, imitating another writer creating it between probe and create.
pub(crate) struct RacyFs {
    lied: RefCell<HashSet<PathBuf>>,
}

impl RacyFs {
    pub(crate) fn new() -> Self {
        Self {
            lied: RefCell::new(HashSet::new()),
        }
    }
}

impl Filesystem for RacyFs {
    fn ensure_directory(&self, path: &Path) -> io::Result<()> {
        LocalFs.ensure_directory(path)
    }

    fn exists(&self, path: &Path) -> bool {
        if self.lied.borrow_mut().insert(path.to_path_buf()) {
            return false;
        }
        LocalFs.exists(path)
    }

    fn write_new(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        LocalFs.write_new(path, bytes)
    }
}
