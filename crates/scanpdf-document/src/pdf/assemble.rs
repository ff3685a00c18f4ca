// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Final assembly: concatenate the page PDFs with Ghostscript, fitting every
// page to the target paper size and recompressing colour images.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use scanpdf_core::error::Result;
use scanpdf_core::{AssemblyConfig, FailurePolicy, PageRecord};
use tracing::{info, instrument, warn};

use crate::tools::{ToolCommand, ToolRunner, run_step};

/// First free output path for a document titled `title` in `dir`.
///
/// `/` in the title becomes `_`. If `<title>.pdf` exists, `<title> (2).pdf`,
/// `<title> (3).pdf` and so on are tried.
pub fn output_path(dir: &Path, title: &str) -> PathBuf {
    let name = title.replace('/', "_");
    let first = dir.join(format!("{name}.pdf"));
    if !first.exists() {
        return first;
    }
    (2u32..)
        .map(|n| dir.join(format!("{name} ({n}).pdf")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

/// Merges page PDFs into the finished document.
pub struct Assembler<R> {
    runner: Arc<R>,
    settings: AssemblyConfig,
    policy: FailurePolicy,
}

impl<R: ToolRunner> Assembler<R> {
    pub fn new(runner: Arc<R>, settings: AssemblyConfig, policy: FailurePolicy) -> Self {
        Self {
            runner,
            settings,
            policy,
        }
    }

    /// Ghostscript invocation writing `pages` and `pdfmarks` to `output`.
    pub fn command(&self, pages: &[PageRecord], output: &Path, pdfmarks: &Path) -> ToolCommand {
        let s = &self.settings;
        let mut output_arg = std::ffi::OsString::from("-sOutputFile=");
        output_arg.push(output);

        ToolCommand::new(&s.ghostscript)
            .args(["-dBATCH", "-dNOPAUSE", "-dNOPAGEPROMPT", "-sDEVICE=pdfwrite"])
            .arg(format!("-sPAPERSIZE={}", s.paper))
            .args(["-dFIXEDMEDIA", "-dPDFFitPage"])
            .arg(format!("-dCompatibilityLevel={}", s.compatibility_level))
            .args([
                "-dAutoFilterColorImages=false",
                "-dColorImageFilter=/DCTEncode",
                "-dDownsampleColorImages=true",
                "-dColorImageDownsampleType=/Average",
                "-dColorImageDownsampleThreshold=1.5",
            ])
            .arg(format!("-dColorImageResolution={}", s.image_resolution))
            .arg(output_arg)
            .args(pages.iter().map(PageRecord::pdf))
            .arg(pdfmarks)
    }

    /// Build `output` from `pages`. Returns `false` when there was nothing to
    /// assemble or the tool failed under best-effort.
    #[instrument(skip_all, fields(output = %output.display(), pages = pages.len()))]
    pub async fn assemble(&self, pages: &[PageRecord], output: &Path, pdfmarks: &Path) -> Result<bool> {
        if pages.is_empty() {
            warn!("No pages to assemble");
            return Ok(false);
        }

        let command = self.command(pages, output, pdfmarks);
        let ok = run_step(&*self.runner, &command, self.policy).await?;
        if ok {
            info!("Document assembled");
        }
        Ok(ok)
    }
}
