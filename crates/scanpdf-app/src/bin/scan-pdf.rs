// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scan-pdf: scan a stack of sheets from the document feeder into one
// searchable PDF named after the document title.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use scanpdf_app::cli::ScanArgs;
use scanpdf_app::{logging, prompt, viewer};
use scanpdf_core::ScanConfig;
use scanpdf_device::{ScanSource, ScanimageDevice};
use scanpdf_document::pdf::metadata::current_author;
use scanpdf_document::{
    Assembler, DocumentInfo, PageProcessor, ScanSession, SystemRunner, output_path,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let args = ScanArgs::parse();

    let mut config = match &args.config {
        Some(path) => ScanConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => ScanConfig::default(),
    };
    args.apply(&mut config);
    let options = args.session_options();

    let document = DocumentInfo::from_title_words(&args.title, current_author(), Local::now());
    info!(title = %document.title, duplex = options.duplex, ocr = options.ocr, "Starting scan");

    let session = ScanSession::create(options)?;
    let pdfmarks = session.path().join("pdfmarks");
    document.write_pdfmark(&pdfmarks)?;

    let mut scanner = ScanimageDevice::open(&config.scanimage, &config.device_name).await?;
    scanner.configure(&config.scan)?;

    let runner = Arc::new(SystemRunner);
    let processor = PageProcessor::new(
        runner.clone(),
        config.processing.clone(),
        config.failure_policy,
        options.ocr,
    );

    println!("Ready to scan");
    let pages = session
        .scan(&mut scanner, processor, || {
            prompt::wait_for_enter("Front pages done, please turn sheets and press Enter")
        })
        .await?;

    if pages.is_empty() {
        println!("Nothing scanned, exiting");
        return Ok(());
    }

    let output = output_path(&args.output_dir, &document.title);
    println!("Creating file {}", output.display());

    Assembler::new(runner, config.assembly.clone(), config.failure_policy)
        .assemble(&pages, &output, &pdfmarks)
        .await?;

    // Remove the working directory before handing over to the viewer.
    drop(session);

    if args.view() {
        viewer::open(&config.viewer, &output)?;
    } else {
        println!("Scanned to {}", output.display());
    }
    Ok(())
}
