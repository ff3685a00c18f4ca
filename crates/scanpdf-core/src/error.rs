// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for scan-pdf and pdf-watermark.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all scanning, processing and stamping operations.
#[derive(Debug, Error)]
pub enum ScanPdfError {
    // -- Scanner errors --
    #[error("no scanner matching \"{0}\" found")]
    DeviceNotFound(String),

    #[error("scanner error: {0}")]
    Device(String),

    /// The automatic document feeder has no more sheets. Ends a side-pass.
    #[error("Document feeder out of documents")]
    FeederEmpty,

    // -- External tools --
    #[error("command `{command}` failed with exit code {code:?}: {stderr}")]
    Tool {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("page job failed: {0}")]
    Job(String),

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("image processing failed: {0}")]
    Image(String),

    #[error("file {} does not exist", .0.display())]
    InputMissing(PathBuf),

    #[error("unsupported font: {0}")]
    UnsupportedFont(String),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScanPdfError {
    /// Whether this error is the end-of-feed signal rather than a failure.
    pub fn is_feeder_empty(&self) -> bool {
        matches!(self, Self::FeederEmpty)
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanPdfError>;
