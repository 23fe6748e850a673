//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves canned responses by request path. Each connection handles one request and closes.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Route {
    /// Fixed response; `Content-Length` is sent only when `declared_len` is set.
    Fixed {
        status: u16,
        content_type: &'static str,
        declared_len: Option<u64>,
        body: Vec<u8>,
    },
    /// `200` with the given type, no length, and zeros written until the client hangs up
    /// or `limit` bytes have gone out.
    Endless {
        content_type: &'static str,
        limit: u64,
    },
    /// Sends a complete head, then holds the connection open without any body.
    Stall {
        status: u16,
        content_type: &'static str,
        declared_len: u64,
    },
    /// Accepts the connection and never answers.
    Silent,
}

impl Route {
    /// `200` with an accurate `Content-Length`.
    pub fn image(content_type: &'static str, body: &[u8]) -> Self {
        Route::Fixed {
            status: 200,
            content_type,
            declared_len: Some(body.len() as u64),
            body: body.to_vec(),
        }
    }

    pub fn status(status: u16) -> Self {
        Route::Fixed {
            status,
            content_type: "text/html",
            declared_len: Some(9),
            body: b"not found".to_vec(),
        }
    }
}

/// Starts the server on an ephemeral port. Returns the base URL without trailing slash,
/// e.g. `http://127.0.0.1:12345`. The server runs until the process exits.
pub fn start(routes: Vec<(&'static str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<&'static str, Route>> = Arc::new(routes.into_iter().collect());
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, routes: &HashMap<&'static str, Route>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    match routes.get(path.as_str()) {
        None => write_fixed(&mut stream, 404, "text/plain", Some(9), b"not found"),
        Some(Route::Fixed {
            status,
            content_type,
            declared_len,
            body,
        }) => write_fixed(&mut stream, *status, content_type, *declared_len, body),
        Some(Route::Endless {
            content_type,
            limit,
        }) => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nConnection: close\r\n\r\n",
                content_type
            );
            if stream.write_all(head.as_bytes()).is_err() {
                return;
            }
            let chunk = vec![0u8; 64 * 1024];
            let mut sent = 0u64;
            while sent < *limit {
                if stream.write_all(&chunk).is_err() {
                    return;
                }
                sent += chunk.len() as u64;
            }
        }
        Some(Route::Stall {
            status,
            content_type,
            declared_len,
        }) => {
            write_fixed(&mut stream, *status, content_type, Some(*declared_len), b"");
            thread::sleep(Duration::from_secs(30));
        }
        Some(Route::Silent) => {
            thread::sleep(Duration::from_secs(30));
        }
    }
}

fn write_fixed(
    stream: &mut TcpStream,
    status: u16,
    content_type: &str,
    declared_len: Option<u64>,
    body: &[u8],
) {
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let length = declared_len
        .map(|l| format!("Content-Length: {}\r\n", l))
        .unwrap_or_default();
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\n{}Connection: close\r\n\r\n",
        status, reason, content_type, length
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}
