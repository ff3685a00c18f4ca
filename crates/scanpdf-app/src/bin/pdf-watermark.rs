// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pdf-watermark: stamp a tiled text line at the top and bottom of every page
// of a PDF.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use scanpdf_app::cli::WatermarkArgs;
use scanpdf_app::{logging, viewer};
use scanpdf_core::ScanPdfError;
use scanpdf_document::Stamper;
use scanpdf_document::watermark::default_output_path;

const VIEWER: &str = "xdg-open";

fn main() -> ExitCode {
    logging::init();
    let args = WatermarkArgs::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &WatermarkArgs) -> Result<()> {
    if !args.in_file.is_file() {
        return Err(ScanPdfError::InputMissing(args.in_file.clone()).into());
    }
    let stamper = Stamper::new(args.style())?;

    let output = match &args.out_file {
        Some(path) => path.clone(),
        None => {
            let path = default_output_path(&args.in_file);
            println!("Generating output file: {}", path.display());
            path
        }
    };

    stamper.stamp_file(&args.in_file, &output, &args.watermark)?;

    if args.open {
        viewer::open(VIEWER, &output)?;
    }
    Ok(())
}
