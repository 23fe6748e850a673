//! Response handler that enforces the content guard while accumulating the body.

use crate::guard::{ContentGuard, GuardViolation};
use crate::http::{Flow, ResponseHandler, ResponseMetadata};

/// Why the collector stopped the transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Stop {
    Status(u32),
    Guard(GuardViolation),
}

/// Owns the body buffer for one fetch. The buffer never grows past the guard's cap:
/// a chunk that would cross it is refused before being appended.
pub(crate) struct BodyCollector {
    guard: ContentGuard,
    status: Option<u32>,
    content_type: String,
    buffer: Vec<u8>,
    stop: Option<Stop>,
}

impl BodyCollector {
    pub(crate) fn new(guard: ContentGuard) -> Self {
        Self {
            guard,
            status: None,
            content_type: String::new(),
            buffer: Vec::new(),
            stop: None,
        }
    }

    /// Status code, once the head arrived.
    pub(crate) fn status(&self) -> Option<u32> {
        self.status
    }

    pub(crate) fn stop_reason(&self) -> Option<&Stop> {
        self.stop.as_ref()
    }

    /// Consumes the collector, yielding the declared content type and the full body.
    pub(crate) fn into_parts(self) -> (String, Vec<u8>) {
        (self.content_type, self.buffer)
    }

    fn halt(&mut self, stop: Stop) -> Flow {
        self.buffer = Vec::new();
        self.stop = Some(stop);
        Flow::Abort
    }
}

impl ResponseHandler for BodyCollector {
    fn on_head(&mut self, status: u32, meta: &ResponseMetadata) -> Flow {
        self.status = Some(status);
        if !(200..300).contains(&status) {
            return self.halt(Stop::Status(status));
        }
        if let Err(v) = self.guard.check_headers(meta) {
            return self.halt(Stop::Guard(v));
        }
        self.content_type = meta.content_type.clone();
        if let Some(len) = meta.content_length {
            // Declared lengths can lie; only pre-size up to what the guard already approved.
            self.buffer.reserve(len.min(self.guard.max_size()) as usize);
        }
        Flow::Continue
    }

    fn on_chunk(&mut self, chunk: &[u8]) -> Flow {
        if self.stop.is_some() {
            return Flow::Abort;
        }
        let next_len = self.buffer.len() as u64 + chunk.len() as u64;
        if let Err(v) = self.guard.check_running_size(next_len) {
            return self.halt(Stop::Guard(v));
        }
        self.buffer.extend_from_slice(chunk);
        Flow::Continue
    }
}
