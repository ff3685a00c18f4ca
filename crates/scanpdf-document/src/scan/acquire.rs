// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page acquisition: pull sheets from the feeder until it runs dry, saving each
// one and handing it to a background job straight away.

use std::path::Path;

use scanpdf_core::error::{Result, ScanPdfError};
use scanpdf_core::{PageRecord, Side};
use scanpdf_device::{ScanSource, ScannedPage};
use tracing::{debug, info, instrument};

use super::jobs::PageJobs;
use crate::tools::ToolRunner;

/// Iterates over the pages of one feeder pass.
///
/// Exhaustion ends the feed. When the feeder reports empty before it has
/// produced anything the read is retried once, since some backends need a
/// moment to notice freshly loaded paper.
pub struct PageFeed<'a, S> {
    source: &'a mut S,
    produced: usize,
    retried: bool,
    exhausted: bool,
}

impl<'a, S: ScanSource> PageFeed<'a, S> {
    pub fn new(source: &'a mut S) -> Self {
        Self {
            source,
            produced: 0,
            retried: false,
            exhausted: false,
        }
    }

    /// Next page, or `None` once the feeder is empty.
    pub async fn next_page(&mut self) -> Result<Option<ScannedPage>> {
        if self.exhausted {
            return Ok(None);
        }
        loop {
            match self.source.read_page().await {
                Ok(page) => {
                    self.produced += 1;
                    return Ok(Some(page));
                }
                Err(err) if err.is_feeder_empty() => {
                    if self.produced == 0 && !self.retried {
                        self.retried = true;
                        debug!("Feeder empty before the first page, retrying once");
                        continue;
                    }
                    self.exhausted = true;
                    return Ok(None);
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub fn produced(&self) -> usize {
        self.produced
    }
}

/// Scan one side of the sheet stack into `dir`.
///
/// Each page is saved as `<page|rear>-<index>-<a|b>.png` and its job spawned
/// before the next sheet is requested. Returns the pages in scan order.
#[instrument(skip(source, dir, jobs), fields(device = source.name()))]
pub async fn acquire_pass<S, R>(
    source: &mut S,
    side: Side,
    dir: &Path,
    jobs: &mut PageJobs<R>,
) -> Result<Vec<PageRecord>>
where
    S: ScanSource,
    R: ToolRunner,
{
    let mut pages = Vec::new();

    let result = {
        let mut feed = PageFeed::new(&mut *source);
        loop {
            let page = match feed.next_page().await {
                Ok(Some(page)) => page,
                Ok(None) => break Ok(()),
                Err(err) => break Err(err),
            };

            let record = PageRecord::new(dir, side, pages.len() as u32 + 1);
            if let Err(err) = save_page(page, &record).await {
                break Err(err);
            }
            info!(page = %record, "Scanned page");
            jobs.spawn(record.clone());
            pages.push(record);
        }
    };

    if let Err(err) = source.cancel().await {
        debug!(error = %err, "Cancel after pass failed");
    }

    result?;
    info!(pages = pages.len(), %side, "Pass finished");
    Ok(pages)
}

async fn save_page(page: ScannedPage, record: &PageRecord) -> Result<()> {
    let path = record.raw_image();
    tokio::task::spawn_blocking(move || page.save_png(&path))
        .await
        .map_err(|err| ScanPdfError::Job(err.to_string()))?
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use scanpdf_core::{FailurePolicy, ProcessingConfig};

    use super::*;
    use crate::scan::process::PageProcessor;
    use crate::testing::{RecordingRunner, ScriptedSource};

    fn jobs() -> PageJobs<RecordingRunner> {
        PageJobs::new(PageProcessor::new(
            Arc::new(RecordingRunner::new()),
            ProcessingConfig::default(),
            FailurePolicy::BestEffort,
            false,
        ))
    }

    #[tokio::test]
    async fn feed_retries_once_before_first_page() {
        let mut script = vec![Err(ScanPdfError::FeederEmpty)];
        script.extend(ScriptedSource::pages(&["p1", "p2"]));
        let mut source = ScriptedSource::new(script);

        let mut feed = PageFeed::new(&mut source);
        assert!(feed.next_page().await.unwrap().is_some());
        assert!(feed.next_page().await.unwrap().is_some());
        assert!(feed.next_page().await.unwrap().is_none());
        assert_eq!(feed.produced(), 2);
        // Once exhausted the device is left alone.
        assert!(feed.next_page().await.unwrap().is_none());
        assert_eq!(source.reads, 4);
    }

    #[tokio::test]
    async fn feed_gives_up_after_two_empty_reads() {
        let mut script = vec![Err(ScanPdfError::FeederEmpty), Err(ScanPdfError::FeederEmpty)];
        script.extend(ScriptedSource::pages(&["late"]));
        let mut source = ScriptedSource::new(script);

        let mut feed = PageFeed::new(&mut source);
        assert!(feed.next_page().await.unwrap().is_none());
        assert_eq!(source.reads, 2);
    }

    #[tokio::test]
    async fn no_retry_after_pages_were_produced() {
        let mut script = ScriptedSource::pages(&["p1"]);
        script.push(Err(ScanPdfError::FeederEmpty));
        script.extend(ScriptedSource::pages(&["p2"]));
        let mut source = ScriptedSource::new(script);

        let mut feed = PageFeed::new(&mut source);
        assert!(feed.next_page().await.unwrap().is_some());
        assert!(feed.next_page().await.unwrap().is_none());
        assert_eq!(source.reads, 2);
    }

    #[tokio::test]
    async fn pass_saves_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ScriptedSource::new(ScriptedSource::pages(&["one", "two", "three"]));
        let mut jobs = jobs();

        let pages = acquire_pass(&mut source, Side::Rear, dir.path(), &mut jobs)
            .await
            .unwrap();

        let names: Vec<String> = pages.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, ["rear-000001-b", "rear-000002-b", "rear-000003-b"]);
        assert_eq!(std::fs::read(pages[1].raw_image()).unwrap(), b"two");
        assert_eq!(jobs.spawned(), 3);
        assert_eq!(source.cancels, 1);
        jobs.join_all().await.unwrap();
    }

    #[tokio::test]
    async fn device_error_aborts_pass() {
        let dir = tempfile::tempdir().unwrap();
        let mut script = ScriptedSource::pages(&["one"]);
        script.push(Err(ScanPdfError::Device("paper jam".into())));
        let mut source = ScriptedSource::new(script);
        let mut jobs = jobs();

        let err = acquire_pass(&mut source, Side::Front, dir.path(), &mut jobs)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanPdfError::Device(_)));
        assert_eq!(source.cancels, 1);
        jobs.join_all().await.unwrap();
    }
}
