// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan configuration. Defaults reproduce the settings of the office MFP the
// tool was written for; a JSON file can override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{ColorMode, FailurePolicy, PaperSize, ScanArea};

/// Complete settings for one `scan-pdf` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Substring of the scanner model name used to pick the device.
    pub device_name: String,
    /// SANE command-line front-end used to talk to the scanner.
    pub scanimage: String,
    /// Driver options applied before scanning.
    pub scan: ScanParams,
    /// Per-page image and OCR pipeline.
    pub processing: ProcessingConfig,
    /// Final document assembly.
    pub assembly: AssemblyConfig,
    /// What to do when an external tool fails.
    pub failure_policy: FailurePolicy,
    /// Program used to open the finished document.
    pub viewer: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            device_name: "MFP_M277".into(),
            scanimage: "scanimage".into(),
            scan: ScanParams::default(),
            processing: ProcessingConfig::default(),
            assembly: AssemblyConfig::default(),
            failure_policy: FailurePolicy::BestEffort,
            viewer: "xdg-open".into(),
        }
    }
}

impl ScanConfig {
    /// Load a configuration file. Fields missing from the file keep their
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

/// Scanner driver options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanParams {
    pub depth: u8,
    pub mode: ColorMode,
    /// Paper source; `ADF` for the automatic document feeder.
    pub source: String,
    pub resolution: u32,
    /// Only passed to backends that expose a compression option.
    pub compression: Option<String>,
    pub area: ScanArea,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            depth: 8,
            mode: ColorMode::Color,
            source: "ADF".into(),
            resolution: 300,
            compression: Some("None".into()),
            area: ScanArea::default(),
        }
    }
}

/// Per-page normalisation and OCR settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Page canvas the normalised image is centred on.
    pub canvas: PaperSize,
    /// Resolution of the canvas in dots per inch.
    pub density: u32,
    /// Tesseract language code.
    pub language: String,
    pub convert: String,
    pub tesseract: String,
    /// Converter turning an image plus hOCR layer into a searchable PDF.
    pub hocr2pdf: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            canvas: PaperSize::A4,
            density: 300,
            language: "deu".into(),
            convert: "convert".into(),
            tesseract: "tesseract".into(),
            hocr2pdf: "HocrConverter.py".into(),
        }
    }
}

/// Ghostscript assembly settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    pub ghostscript: String,
    /// Ghostscript paper size name.
    pub paper: String,
    /// Target resolution for downsampled colour images.
    pub image_resolution: u32,
    pub compatibility_level: String,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            ghostscript: "gs".into(),
            paper: "a4".into(),
            image_resolution: 300,
            compatibility_level: "1.5".into(),
        }
    }
}
