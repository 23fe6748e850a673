//! `imgfetch fetch` – run one batch and report each URL as it finishes.

use anyhow::{Context, Result};
use imgfetch_core::batch::{BatchRunner, Summary};
use imgfetch_core::config::FetchConfig;
use imgfetch_core::http::CurlClient;
use imgfetch_core::pipeline::{FetchOutcome, FetchPipeline, FetchRequest};
use imgfetch_core::storage::LocalFs;
use std::path::PathBuf;

use crate::cli::input;

/// Exit code for `--strict` when at least one URL failed.
const EXIT_SOME_FAILED: i32 = 2;

#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub urls: Vec<String>,
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub strict: bool,
}

pub fn run_fetch(cfg: &FetchConfig, args: FetchArgs) -> Result<i32> {
    let urls = input::collect_urls(&args.urls, args.input.as_deref())?;
    if urls.is_empty() {
        println!("No URLs provided. Nothing to fetch.");
        return Ok(0);
    }

    let mut cfg = cfg.clone();
    if let Some(dir) = args.output_dir {
        cfg.output_dir = dir;
    }

    let pipeline = FetchPipeline::new(CurlClient::new(), LocalFs, &cfg);
    pipeline
        .prepare()
        .with_context(|| format!("create output directory {}", cfg.output_dir.display()))?;
    println!("Saving images to {}", pipeline.target_dir().display());

    let requests: Vec<FetchRequest> = urls.into_iter().map(FetchRequest::new).collect();
    let total = requests.len();
    let mut runner = BatchRunner::new(pipeline);
    let report = runner.fetch_all_with(&requests, |i, request, outcome| {
        println!("[{}/{}] {}", i + 1, total, request.url);
        println!("  {}", describe(outcome));
    });

    println!();
    println!("{}", summary_line(&report.summary));
    println!("Unique images this run: {}", report.unique_images);

    if args.strict && report.summary.failed > 0 {
        Ok(EXIT_SOME_FAILED)
    } else {
        Ok(0)
    }
}

fn describe(outcome: &FetchOutcome) -> String {
    match outcome {
        FetchOutcome::Success { path, size_bytes } => {
            format!("saved {} ({} bytes)", path.display(), size_bytes)
        }
        FetchOutcome::Duplicate => "skipped: same image already fetched in this run".to_string(),
        FetchOutcome::Failure { kind, message } => format!("failed ({}): {}", kind, message),
    }
}

fn summary_line(s: &Summary) -> String {
    format!(
        "Summary: {} attempted, {} saved, {} duplicate, {} failed",
        s.attempted, s.succeeded, s.duplicates, s.failed
    )
}
