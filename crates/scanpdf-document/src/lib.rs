// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanpdf-document: everything between the scanner and the finished PDF.
//
// Provides the scanning pipeline (acquisition passes, per-page processing jobs,
// duplex reconciliation), Ghostscript assembly with document-info metadata, and
// the text watermark stamper used by `pdf-watermark`.

pub mod pdf;
pub mod scan;
pub mod tools;
pub mod watermark;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the primary structs so callers can use `scanpdf_document::ScanSession` etc.
pub use pdf::assemble::{Assembler, output_path};
pub use pdf::metadata::DocumentInfo;
pub use scan::process::PageProcessor;
pub use scan::session::{ScanSession, SessionOptions};
pub use tools::{SystemRunner, ToolCommand, ToolRunner};
pub use watermark::layout::{StandardFont, WatermarkStyle};
pub use watermark::stamp::Stamper;
