//! libcurl-backed [`HttpClient`].

use std::cell::RefCell;
use std::str;

use super::parse::parse_header_lines;
use super::{Flow, HttpClient, HttpRequest, ResponseHandler, TransportError};

/// Maximum redirects followed before giving up.
const MAX_REDIRECTS: u32 = 10;

/// Blocking GET via `curl::easy::Easy`. One handle per request; runs on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlClient;

impl CurlClient {
    pub fn new() -> Self {
        Self
    }
}

/// Shared between the header and write callbacks of one transfer.
struct TransferState<'h> {
    header_lines: Vec<String>,
    head_sent: bool,
    aborted: bool,
    handler: &'h mut dyn ResponseHandler,
}

impl TransferState<'_> {
    /// Records one header line. On the blank line closing a block that curl will not
    /// follow (not 1xx, not a redirect with `Location`), delivers `on_head` right away
    /// so header-level rejections don't wait for the body.
    fn push_header_line(&mut self, line: &str) -> Flow {
        let line = line.trim_end();
        self.header_lines.push(line.to_string());
        if !line.is_empty() || self.head_sent {
            return Flow::Continue;
        }
        let (status, meta) = parse_header_lines(&self.header_lines);
        let Some(code) = status else {
            return Flow::Continue;
        };
        let interim = (100..200).contains(&code);
        let followed = (300..400).contains(&code) && meta.header("location").is_some();
        if interim || followed {
            return Flow::Continue;
        }
        self.send_head(code)
    }

    /// Delivers `on_head` once, from the header lines collected so far.
    fn send_head(&mut self, fallback_status: u32) -> Flow {
        if self.head_sent {
            return Flow::Continue;
        }
        self.head_sent = true;
        let (status, meta) = parse_header_lines(&self.header_lines);
        self.handler
            .on_head(status.unwrap_or(fallback_status), &meta)
    }
}

impl HttpClient for CurlClient {
    fn get(
        &self,
        request: &HttpRequest,
        handler: &mut dyn ResponseHandler,
    ) -> Result<(), TransportError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(&request.url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
        easy.connect_timeout(request.timeout)?;
        // Stall detection: fail if fewer than 1 byte/s arrives for `timeout`.
        easy.low_speed_limit(1)?;
        easy.low_speed_time(request.timeout)?;
        easy.accept_encoding("gzip, deflate")?;
        if request.buffer_size > 0 {
            easy.buffer_size(request.buffer_size)?;
        }

        let mut list = curl::easy::List::new();
        for (k, v) in &request.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if !request.headers.is_empty() {
            easy.http_headers(list)?;
        }

        let state = RefCell::new(TransferState {
            header_lines: Vec::new(),
            head_sent: false,
            aborted: false,
            handler,
        });

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                let Ok(line) = str::from_utf8(data) else {
                    return true;
                };
                let mut st = state.borrow_mut();
                match st.push_header_line(line) {
                    Flow::Continue => true,
                    Flow::Abort => {
                        // A false return makes libcurl stop with a write error.
                        st.aborted = true;
                        false
                    }
                }
            })?;
            transfer.write_function(|data| {
                let mut st = state.borrow_mut();
                let flow = match st.send_head(0) {
                    Flow::Continue => st.handler.on_chunk(data),
                    Flow::Abort => Flow::Abort,
                };
                match flow {
                    Flow::Continue => Ok(data.len()),
                    Flow::Abort => {
                        st.aborted = true;
                        // Returning fewer bytes than offered makes libcurl stop with a write error.
                        Ok(0)
                    }
                }
            })?;
            transfer.perform()
        };

        let mut st = state.into_inner();
        match performed {
            Err(e) if st.aborted && e.is_write_error() => {
                tracing::debug!(url = %request.url, "transfer aborted by handler");
                Ok(())
            }
            Err(e) => Err(e.into()),
            Ok(()) => {
                // Empty body: the write callback never ran.
                let code = easy.response_code().unwrap_or(0);
                st.send_head(code);
                Ok(())
            }
        }
    }
}

impl From<curl::Error> for TransportError {
    fn from(e: curl::Error) -> Self {
        let msg = e.to_string();
        if e.is_operation_timedout() {
            TransportError::Timeout(msg)
        } else if e.is_couldnt_connect()
            || e.is_couldnt_resolve_host()
            || e.is_couldnt_resolve_proxy()
            || e.is_ssl_connect_error()
            || e.is_peer_failed_verification()
            || e.is_got_nothing()
            || e.is_recv_error()
            || e.is_send_error()
        {
            TransportError::Connect(msg)
        } else {
            TransportError::Other(msg)
        }
    }
}
