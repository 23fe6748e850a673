//! Sequential batch driver over [`FetchPipeline`] with an aggregate summary.

use crate::dedup::DedupIndex;
use crate::http::HttpClient;
use crate::pipeline::{FetchOutcome, FetchPipeline, FetchRequest};
use crate::storage::Filesystem;

/// Outcome counts for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub attempted: usize,
    pub succeeded: usize,
    pub duplicates: usize,
    pub failed: usize,
}

impl Summary {
    fn record(&mut self, outcome: &FetchOutcome) {
        self.attempted += 1;
        match outcome {
            FetchOutcome::Success { .. } => self.succeeded += 1,
            FetchOutcome::Duplicate => self.duplicates += 1,
            FetchOutcome::Failure { .. } => self.failed += 1,
        }
    }
}

/// Everything a batch produced, in input order.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub summary: Summary,
    /// Distinct contents seen by the dedup index at the end of the batch.
    pub unique_images: usize,
    pub outcomes: Vec<(FetchRequest, FetchOutcome)>,
}

/// Owns the pipeline and the batch's dedup index.
pub struct BatchRunner<C, F> {
    pipeline: FetchPipeline<C, F>,
    index: DedupIndex,
}

impl<C: HttpClient, F: Filesystem> BatchRunner<C, F> {
    pub fn new(pipeline: FetchPipeline<C, F>) -> Self {
        Self::with_index(pipeline, DedupIndex::new())
    }

    /// Starts from an existing index, e.g. one pre-seeded with known digests.
    pub fn with_index(pipeline: FetchPipeline<C, F>, index: DedupIndex) -> Self {
        Self { pipeline, index }
    }

    pub fn pipeline(&self) -> &FetchPipeline<C, F> {
        &self.pipeline
    }

    pub fn index(&self) -> &DedupIndex {
        &self.index
    }

    pub fn fetch_all(&mut self, requests: &[FetchRequest]) -> BatchReport {
        self.fetch_all_with(requests, |_, _, _| {})
    }

    /// Fetches every request in order; `observe(position, request, outcome)` runs after
    /// each one (position is 0-based). A failure never stops the batch.
    pub fn fetch_all_with<O>(&mut self, requests: &[FetchRequest], mut observe: O) -> BatchReport
    where
        O: FnMut(usize, &FetchRequest, &FetchOutcome),
    {
        tracing::info!(count = requests.len(), "starting batch");
        let mut summary = Summary::default();
        let mut outcomes = Vec::with_capacity(requests.len());

        for (i, request) in requests.iter().enumerate() {
            let outcome = self.pipeline.fetch_one(request, &mut self.index);
            summary.record(&outcome);
            observe(i, request, &outcome);
            outcomes.push((request.clone(), outcome));
        }

        tracing::info!(
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            duplicates = summary.duplicates,
            failed = summary.failed,
            unique = self.index.len(),
            "batch finished"
        );
        BatchReport {
            summary,
            unique_images: self.index.len(),
            outcomes,
        }
    }
}
