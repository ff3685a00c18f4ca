// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-page image pipeline: normalise the raw scan onto the page canvas, build
// a high-contrast text layer, merge it back and turn the result into a page
// PDF, optionally with an invisible OCR text layer.

use std::sync::Arc;

use scanpdf_core::error::Result;
use scanpdf_core::{FailurePolicy, PageRecord, ProcessingConfig};
use tracing::{debug, info, instrument};

use crate::tools::{ToolCommand, ToolRunner, run_step};

/// Result of one finished page job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    pub page: PageRecord,
    /// Steps that failed and were skipped under the best-effort policy.
    pub failed_steps: usize,
}

/// Turns raw page scans into page PDFs.
///
/// Cheap to clone; every page job gets its own copy.
pub struct PageProcessor<R> {
    runner: Arc<R>,
    settings: Arc<ProcessingConfig>,
    policy: FailurePolicy,
    ocr: bool,
}

impl<R> Clone for PageProcessor<R> {
    fn clone(&self) -> Self {
        Self {
            runner: Arc::clone(&self.runner),
            settings: Arc::clone(&self.settings),
            policy: self.policy,
            ocr: self.ocr,
        }
    }
}

impl<R: ToolRunner> PageProcessor<R> {
    pub fn new(runner: Arc<R>, settings: ProcessingConfig, policy: FailurePolicy, ocr: bool) -> Self {
        Self {
            runner,
            settings: Arc::new(settings),
            policy,
            ocr,
        }
    }

    /// The tool invocations for `page`, in execution order.
    pub fn commands(&self, page: &PageRecord) -> Vec<ToolCommand> {
        let s = &*self.settings;
        let (width, height) = s.canvas.pixel_extent(s.density);

        let normalise = ToolCommand::new(&s.convert)
            .args(["-units", "PixelsPerInch"])
            .arg(page.raw_image())
            .args(["-channel", "RGB"])
            .args(["-contrast-stretch", "0.5x10%"])
            .args(["-level", "0%,90%,1.4"])
            .args(["-deskew", "60%", "+repage"])
            .args(["-gravity", "center", "-background", "white"])
            .arg("-extent")
            .arg(format!("{width}x{height}"))
            .arg("-density")
            .arg(s.density.to_string())
            .arg(page.optimized_image());

        let cache = ToolCommand::new(&s.convert)
            .args(["-quiet", "-regard-warnings"])
            .arg(page.optimized_image())
            .arg("+repage")
            .arg(page.intermediate());

        let binarise = ToolCommand::new(&s.convert)
            .args(["-respect-parenthesis", "("])
            .arg(page.intermediate())
            .args(["-colorspace", "gray", "-type", "grayscale"])
            .args(["-contrast-stretch", "0,10%", ")"])
            .args(["(", "-clone", "0", "-colorspace", "gray", "-negate"])
            .args(["-lat", "50x50+20%", "-contrast-stretch", "0", ")"])
            .args(["-compose", "copy_opacity", "-composite"])
            .args(["-fill", "white", "-opaque", "none", "-alpha", "off"])
            .args(["-sharpen", "0x1", "-modulate", "100,200"])
            .args(["-statistic", "Minimum", "2x2"])
            .arg(page.ocr_image());

        let recombine = ToolCommand::new(&s.convert)
            .arg(page.optimized_image())
            .arg("(")
            .arg(page.ocr_image())
            .args(["-normalize", "+level", "0,10%", ")"])
            .args(["-compose", "screen", "-composite"])
            .args(["-contrast-stretch", "0.75%"])
            .arg(page.ocr_input());

        let mut commands = vec![normalise, cache, binarise, recombine];

        if self.ocr {
            commands.push(
                ToolCommand::new(&s.tesseract)
                    .arg(page.ocr_input())
                    .arg(page.stem())
                    .args(["-l", s.language.as_str(), "hocr"]),
            );
            commands.push(
                ToolCommand::new(&s.hocr2pdf)
                    .args(["-V", "-I", "-q", "-i"])
                    .arg(page.hocr())
                    .arg("-o")
                    .arg(page.pdf())
                    .arg(page.ocr_input()),
            );
        } else {
            commands.push(
                ToolCommand::new(&s.convert)
                    .arg(page.ocr_input())
                    .arg(page.pdf()),
            );
        }

        commands
    }

    /// Run every step for `page` in order.
    ///
    /// Under best-effort a failing step is logged and the next one still runs
    /// against whatever files exist. Under fail-fast the first failure ends the
    /// job with an error.
    #[instrument(skip_all, fields(page = %page))]
    pub async fn process(&self, page: PageRecord) -> Result<PageOutcome> {
        debug!(ocr = self.ocr, "Processing page");

        let mut failed_steps = 0;
        for command in self.commands(&page) {
            if !run_step(&*self.runner, &command, self.policy).await? {
                failed_steps += 1;
            }
        }

        info!(failed_steps, "Page processed");
        Ok(PageOutcome {
            page,
            failed_steps,
        })
    }
}
