// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments of both tools.

use std::path::PathBuf;

use clap::Parser;
use scanpdf_core::{FailurePolicy, PaperSize, ScanConfig};
use scanpdf_document::{SessionOptions, StandardFont, WatermarkStyle};

/// Scan a document from the automatic feeder into a searchable PDF.
#[derive(Debug, Parser)]
#[command(name = "scan-pdf", version, about = "Scan a document")]
pub struct ScanArgs {
    /// Scan a single-sided document, default is duplex
    #[arg(short = '1', long)]
    pub single_side: bool,

    /// Disable optical character recognition, default is on
    #[arg(short = 'o', long)]
    pub no_ocr: bool,

    /// Don't show the generated file, shown by default
    #[arg(short = 'v', long)]
    pub no_view: bool,

    /// Use the first scanner whose model name contains this text
    #[arg(short = 'd', long)]
    pub device: Option<String>,

    /// JSON configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Directory the finished document is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Abort when an image or OCR tool fails instead of carrying on
    #[arg(long)]
    pub fail_fast: bool,

    /// Document title; a leading YYYYMMDD word sets the document date
    #[arg(value_name = "TITLE", required = true, num_args = 1..)]
    pub title: Vec<String>,
}

impl ScanArgs {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            duplex: !self.single_side,
            ocr: !self.no_ocr,
        }
    }

    pub fn view(&self) -> bool {
        !self.no_view
    }

    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut ScanConfig) {
        if let Some(device) = &self.device {
            config.device_name = device.clone();
        }
        if self.fail_fast {
            config.failure_policy = FailurePolicy::FailFast;
        }
    }
}

/// Add a watermark to a PDF file.
#[derive(Debug, Parser)]
#[command(name = "pdf-watermark", version, about = "Add watermark to a PDF file")]
pub struct WatermarkArgs {
    /// Input PDF
    #[arg(value_name = "inFile")]
    pub in_file: PathBuf,

    /// Text to be printed as watermark
    pub watermark: String,

    /// Output PDF [default: <inFile>.stamped.pdf]
    #[arg(value_name = "outFile")]
    pub out_file: Option<PathBuf>,

    /// Opacity of the watermark, 0 to 1
    #[arg(short, long, default_value_t = 0.6)]
    pub alpha: f32,

    /// Red component of the watermark colour, 0 to 255
    #[arg(short = 'R', long, default_value_t = 0)]
    pub red: u8,

    /// Green component of the watermark colour, 0 to 255
    #[arg(short = 'G', long, default_value_t = 0)]
    pub green: u8,

    /// Blue component of the watermark colour, 0 to 255
    #[arg(short = 'B', long, default_value_t = 0)]
    pub blue: u8,

    /// Standard PDF font of the watermark
    #[arg(short, long, default_value = "Courier-Bold")]
    pub font: StandardFont,

    /// Size of the watermark font in points
    #[arg(short = 's', long, alias = "fontSize", default_value_t = 16.0)]
    pub font_size: f32,

    /// Page size the watermark is laid out for (A3, A4, A5, Letter, Legal or <w>x<h>mm)
    #[arg(short = 'p', long, alias = "pageSize", default_value = "A4")]
    pub page_size: PaperSize,

    /// Open the new document
    #[arg(short, long)]
    pub open: bool,

    /// Separator character
    #[arg(short = 'c', long, default_value_t = '•')]
    pub separator_char: char,

    /// Number of times the separator is repeated
    #[arg(short = 'r', long, default_value_t = 3)]
    pub separator_repeat: usize,
}

impl WatermarkArgs {
    pub fn style(&self) -> WatermarkStyle {
        WatermarkStyle {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha: self.alpha,
            font: self.font,
            font_size: self.font_size,
            page_size: self.page_size,
            separator_char: self.separator_char,
            separator_repeat: self.separator_repeat,
            ..WatermarkStyle::default()
        }
    }
}
