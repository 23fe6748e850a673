//! Turning CLI arguments and input files into a URL list.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Splits text holding URLs separated by newlines and/or commas. Blank entries are dropped.
pub fn split_urls(text: &str) -> Vec<String> {
    text.split(['\n', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Positional arguments first, then entries from `input` (a path, or `-` for stdin).
pub fn collect_urls(args: &[String], input: Option<&Path>) -> Result<Vec<String>> {
    let mut urls: Vec<String> = args.iter().flat_map(|a| split_urls(a)).collect();

    if let Some(path) = input {
        let text = if path == Path::new("-") {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("read URLs from stdin")?;
            s
        } else {
            std::fs::read_to_string(path)
                .with_context(|| format!("read URL list {}", path.display()))?
        };
        urls.extend(split_urls(&text));
    }

    Ok(urls)
}
