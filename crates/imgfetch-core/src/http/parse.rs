//! Parse raw response header lines (as delivered by libcurl) into status + metadata.

use super::ResponseMetadata;

/// Parses the header lines of a response.
///
/// libcurl delivers every header block when following redirects; each status line
/// starts a new block and only the last block is kept. Returns the status code of
/// that block (if a status line was seen) and its metadata.
pub fn parse_header_lines(lines: &[String]) -> (Option<u32>, ResponseMetadata) {
    let mut status = None;
    let mut pairs: Vec<(&str, &str)> = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            status = parse_status_line(line);
            pairs.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            pairs.push((name.trim(), value.trim()));
        }
    }

    (status, ResponseMetadata::from_pairs(pairs))
}

/// `HTTP/1.1 404 Not Found` → 404; `HTTP/2 200` → 200.
fn parse_status_line(line: &str) -> Option<u32> {
    line.split_whitespace().nth(1)?.parse().ok()
}
