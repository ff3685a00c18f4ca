// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan session: owns the working directory and drives the passes, the job
// barrier and the duplex merge. The scanner is released on every exit path.

use std::future::Future;
use std::path::Path;

use scanpdf_core::error::Result;
use scanpdf_core::{PageRecord, Side};
use scanpdf_device::ScanSource;
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};

use super::acquire::acquire_pass;
use super::duplex::{reconcile, sort_pages};
use super::jobs::PageJobs;
use super::process::PageProcessor;
use crate::tools::ToolRunner;

/// What the operator asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Scan the rear sides in a second pass.
    pub duplex: bool,
    pub ocr: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            duplex: true,
            ocr: true,
        }
    }
}

/// One scanning run. The working directory and everything in it is removed
/// when the session is dropped.
pub struct ScanSession {
    workdir: TempDir,
    options: SessionOptions,
}

impl ScanSession {
    pub fn create(options: SessionOptions) -> Result<Self> {
        let workdir = tempfile::Builder::new().prefix("scan-pdf-").tempdir()?;
        debug!(path = %workdir.path().display(), "Session directory created");
        Ok(Self { workdir, options })
    }

    pub fn path(&self) -> &Path {
        self.workdir.path()
    }

    /// Scan every page and return them in document order, each with its page
    /// PDF produced.
    ///
    /// `turn_sheets` is awaited between the front and the rear pass. An empty
    /// front pass ends the session early with no pages.
    #[instrument(skip_all, fields(duplex = self.options.duplex, ocr = self.options.ocr))]
    pub async fn scan<S, R, F, Fut>(
        &self,
        source: &mut S,
        processor: PageProcessor<R>,
        turn_sheets: F,
    ) -> Result<Vec<PageRecord>>
    where
        S: ScanSource,
        R: ToolRunner,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut jobs = PageJobs::new(processor);
        let passes = self.run_passes(source, &mut jobs, turn_sheets).await;
        release(source).await;

        let (front, rear) = match passes {
            Ok(passes) => passes,
            Err(err) => {
                // Let running jobs finish before the directory goes away.
                if let Err(job_err) = jobs.join_all().await {
                    debug!(error = %job_err, "Page job failed during abort");
                }
                return Err(err);
            }
        };

        if front.is_empty() {
            warn!("Nothing scanned");
            return Ok(Vec::new());
        }

        jobs.join_all().await?;

        match rear {
            Some(rear) => reconcile(front, rear),
            None => {
                let mut pages = front;
                sort_pages(&mut pages);
                Ok(pages)
            }
        }
    }

    async fn run_passes<S, R, F, Fut>(
        &self,
        source: &mut S,
        jobs: &mut PageJobs<R>,
        turn_sheets: F,
    ) -> Result<(Vec<PageRecord>, Option<Vec<PageRecord>>)>
    where
        S: ScanSource,
        R: ToolRunner,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let front = acquire_pass(source, Side::Front, self.path(), jobs).await?;
        if front.is_empty() || !self.options.duplex {
            return Ok((front, None));
        }

        info!(pages = front.len(), "Front pages done, please turn sheets");
        turn_sheets().await;

        let rear = acquire_pass(source, Side::Rear, self.path(), jobs).await?;
        Ok((front, Some(rear)))
    }
}

/// Close the scanner. A failure here is logged and never replaces the error
/// that ended the session.
async fn release<S: ScanSource>(source: &mut S) {
    if let Err(err) = source.close().await {
        warn!(error = %err, "Failed to release scanner");
    }
}
