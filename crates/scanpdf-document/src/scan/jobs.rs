// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background page jobs and their join barrier.

use scanpdf_core::PageRecord;
use scanpdf_core::error::{Result, ScanPdfError};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::process::{PageOutcome, PageProcessor};
use crate::tools::ToolRunner;

/// One task per scanned page, all joined together before assembly.
pub struct PageJobs<R> {
    processor: PageProcessor<R>,
    set: JoinSet<Result<PageOutcome>>,
    spawned: usize,
}

impl<R: ToolRunner> PageJobs<R> {
    pub fn new(processor: PageProcessor<R>) -> Self {
        Self {
            processor,
            set: JoinSet::new(),
            spawned: 0,
        }
    }

    /// Start processing `page` in the background. Never waits.
    pub fn spawn(&mut self, page: PageRecord) {
        debug!(page = %page, "Spawning page job");
        let processor = self.processor.clone();
        self.set.spawn(async move { processor.process(page).await });
        self.spawned += 1;
    }

    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Wait for every job. All jobs are drained even when one fails; the
    /// first error is returned.
    pub async fn join_all(&mut self) -> Result<Vec<PageOutcome>> {
        let mut outcomes = Vec::with_capacity(self.set.len());
        let mut first_error = None;

        while let Some(joined) = self.set.join_next().await {
            let result = joined
                .map_err(|err| ScanPdfError::Job(err.to_string()))
                .and_then(|outcome| outcome);
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => {
                    warn!(error = %err, "Page job failed");
                    first_error.get_or_insert(err);
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        let failed_steps: usize = outcomes.iter().map(|o| o.failed_steps).sum();
        info!(pages = outcomes.len(), failed_steps, "All page jobs finished");
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use scanpdf_core::{FailurePolicy, ProcessingConfig, Side};

    use super::*;
    use crate::testing::RecordingRunner;

    #[tokio::test]
    async fn joins_every_job() {
        let runner = Arc::new(RecordingRunner::new());
        let dir = tempfile::tempdir().unwrap();
        let processor = PageProcessor::new(
            runner.clone(),
            ProcessingConfig::default(),
            FailurePolicy::BestEffort,
            false,
        );

        let mut jobs = PageJobs::new(processor);
        for index in 1..=4 {
            jobs.spawn(PageRecord::new(dir.path(), Side::Front, index));
        }
        assert_eq!(jobs.spawned(), 4);

        let outcomes = jobs.join_all().await.unwrap();
        assert_eq!(outcomes.len(), 4);
        assert_eq!(runner.count("convert"), 4 * 5);
        for index in 1..=4 {
            assert!(PageRecord::new(dir.path(), Side::Front, index).pdf().exists());
        }
    }

    #[tokio::test]
    async fn first_failure_surfaces_after_draining() {
        let runner = Arc::new(RecordingRunner::failing(&["convert"]));
        let dir = tempfile::tempdir().unwrap();
        let processor = PageProcessor::new(
            runner.clone(),
            ProcessingConfig::default(),
            FailurePolicy::FailFast,
            true,
        );

        let mut jobs = PageJobs::new(processor);
        jobs.spawn(PageRecord::new(dir.path(), Side::Front, 1));
        jobs.spawn(PageRecord::new(dir.path(), Side::Front, 2));

        let err = jobs.join_all().await.unwrap_err();
        assert!(matches!(err, ScanPdfError::Tool { .. }));
        // Both jobs ran their first step before stopping.
        assert_eq!(runner.commands().len(), 2);
    }
}
