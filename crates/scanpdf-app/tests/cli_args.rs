// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Argument parsing of both command-line tools.

use std::path::PathBuf;

use clap::Parser;
use scanpdf_app::cli::{ScanArgs, WatermarkArgs};
use scanpdf_core::{FailurePolicy, PaperSize, ScanConfig};
use scanpdf_document::StandardFont;

#[test]
fn scan_defaults() {
    let args = ScanArgs::try_parse_from(["scan-pdf", "Tax", "notice"]).unwrap();
    assert_eq!(args.title, ["Tax", "notice"]);
    let options = args.session_options();
    assert!(options.duplex);
    assert!(options.ocr);
    assert!(args.view());
    assert_eq!(args.output_dir, PathBuf::from("."));
}

#[test]
fn scan_short_flags() {
    let args = ScanArgs::try_parse_from(["scan-pdf", "-1", "-o", "-v", "20250107", "Invoice"]).unwrap();
    let options = args.session_options();
    assert!(!options.duplex);
    assert!(!options.ocr);
    assert!(!args.view());
    assert_eq!(args.title, ["20250107", "Invoice"]);
}

#[test]
fn scan_requires_title() {
    assert!(ScanArgs::try_parse_from(["scan-pdf", "--single-side"]).is_err());
}

#[test]
fn scan_overrides_configuration() {
    let args = ScanArgs::try_parse_from([
        "scan-pdf",
        "--device",
        "ScanSnap",
        "--fail-fast",
        "Letter",
    ])
    .unwrap();
    let mut config = ScanConfig::default();
    args.apply(&mut config);
    assert_eq!(config.device_name, "ScanSnap");
    assert_eq!(config.failure_policy, FailurePolicy::FailFast);

    let args = ScanArgs::try_parse_from(["scan-pdf", "Letter"]).unwrap();
    let mut config = ScanConfig::default();
    args.apply(&mut config);
    assert_eq!(config.device_name, "MFP_M277");
    assert_eq!(config.failure_policy, FailurePolicy::BestEffort);
}

#[test]
fn watermark_defaults() {
    let args = WatermarkArgs::try_parse_from(["pdf-watermark", "in.pdf", "COPY"]).unwrap();
    assert_eq!(args.in_file, PathBuf::from("in.pdf"));
    assert_eq!(args.out_file, None);
    assert!(!args.open);

    let style = args.style();
    assert_eq!(style.alpha, 0.6);
    assert_eq!(style.font, StandardFont::CourierBold);
    assert_eq!(style.font_size, 16.0);
    assert_eq!(style.page_size, PaperSize::A4);
    assert_eq!(style.separator_char, '•');
    assert_eq!(style.separator_repeat, 3);
    assert_eq!(style.margin, 10.0);
    assert_eq!((style.red, style.green, style.blue), (0, 0, 0));
}

#[test]
fn watermark_options() {
    let args = WatermarkArgs::try_parse_from([
        "pdf-watermark",
        "-a",
        "0.3",
        "-R",
        "200",
        "-B",
        "10",
        "-f",
        "Helvetica",
        "--fontSize",
        "12",
        "-p",
        "Letter",
        "-c",
        "*",
        "-r",
        "1",
        "-o",
        "in.pdf",
        "DRAFT",
        "out.pdf",
    ])
    .unwrap();

    assert_eq!(args.out_file, Some(PathBuf::from("out.pdf")));
    assert!(args.open);
    let style = args.style();
    assert_eq!(style.alpha, 0.3);
    assert_eq!((style.red, style.green, style.blue), (200, 0, 10));
    assert_eq!(style.font, StandardFont::Helvetica);
    assert_eq!(style.font_size, 12.0);
    assert_eq!(style.page_size, PaperSize::Letter);
    assert_eq!(style.separator_char, '*');
    assert_eq!(style.separator_repeat, 1);
}

#[test]
fn watermark_rejects_bad_values() {
    assert!(WatermarkArgs::try_parse_from(["pdf-watermark", "-f", "Papyrus", "in.pdf", "X"]).is_err());
    assert!(WatermarkArgs::try_parse_from(["pdf-watermark", "-R", "300", "in.pdf", "X"]).is_err());
    assert!(WatermarkArgs::try_parse_from(["pdf-watermark", "in.pdf"]).is_err());
}
