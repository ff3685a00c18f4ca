// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: paper sizes, page sides, page records and failure policy.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScanPdfError;

const MM_PER_INCH: f64 = 25.4;
const PT_PER_INCH: f64 = 72.0;

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in PostScript points (width, height).
    ///
    /// US sizes are defined in inches, so they are returned exactly rather
    /// than via the rounded millimetre values.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            _ => {
                let (w, h) = self.dimensions_mm();
                (mm_to_pt(w as f64), mm_to_pt(h as f64))
            }
        }
    }

    /// Pixel extent of the full page at `dpi`, as used for ImageMagick's
    /// `-extent` geometry.
    pub fn pixel_extent(&self, dpi: u32) -> (u32, u32) {
        let (w, h) = self.dimensions_mm();
        let to_px = |mm: u32| (mm as f64 / MM_PER_INCH * dpi as f64).round() as u32;
        (to_px(w), to_px(h))
    }
}

fn mm_to_pt(mm: f64) -> f32 {
    (mm / MM_PER_INCH * PT_PER_INCH) as f32
}

impl FromStr for PaperSize {
    type Err = ScanPdfError;

    /// Accepts the named sizes (case-insensitive) or `<width>x<height>` in mm.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "a3" => Ok(Self::A3),
            "a5" => Ok(Self::A5),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            other => {
                let parsed = other
                    .trim_end_matches("mm")
                    .split_once('x')
                    .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)));
                match parsed {
                    Some((width_mm, height_mm)) if width_mm > 0 && height_mm > 0 => {
                        Ok(Self::Custom {
                            width_mm,
                            height_mm,
                        })
                    }
                    _ => Err(ScanPdfError::InvalidSetting(format!(
                        "unknown page size \"{s}\" (expected A3, A4, A5, Letter, Legal or <w>x<h>mm)"
                    ))),
                }
            }
        }
    }
}

/// Which side of the sheet stack a pass scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Front,
    Rear,
}

impl Side {
    /// File name prefix used while the page is still in its scan pass.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Front => "page",
            Self::Rear => "rear",
        }
    }

    /// File name suffix identifying the side in the final document order.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Front => "a",
            Self::Rear => "b",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => f.write_str("front"),
            Self::Rear => f.write_str("rear"),
        }
    }
}

/// One physical page side, identified by its sequence index within a pass.
///
/// The stem is the artifact path without extension; every file derived from
/// the page (raw scan, optimised image, hOCR layer, page PDF) hangs off it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRecord {
    index: u32,
    side: Side,
    stem: PathBuf,
}

impl PageRecord {
    /// Record for a page as it is scanned: `<dir>/<page|rear>-<index:06>-<a|b>`.
    pub fn new(dir: &Path, side: Side, index: u32) -> Self {
        Self::with_prefix(dir, side.prefix(), side, index)
    }

    /// Record in final document naming: `<dir>/page-<index:06>-<a|b>`.
    pub fn interleaved(dir: &Path, side: Side, index: u32) -> Self {
        Self::with_prefix(dir, Side::Front.prefix(), side, index)
    }

    fn with_prefix(dir: &Path, prefix: &str, side: Side, index: u32) -> Self {
        let stem = dir.join(format!("{prefix}-{index:06}-{}", side.suffix()));
        Self { index, side, stem }
    }

    /// Same page under a new index, in final document naming and in the same
    /// directory.
    pub fn renumbered(&self, index: u32) -> Self {
        let dir = self.stem.parent().unwrap_or_else(|| Path::new(""));
        Self::interleaved(dir, self.side, index)
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn stem(&self) -> &Path {
        &self.stem
    }

    /// File name of the stem, the ordering key of the final page list.
    pub fn file_name(&self) -> OsString {
        self.stem.file_name().map(OsString::from).unwrap_or_default()
    }

    /// Path of the artifact `<stem>.<suffix>`.
    pub fn artifact(&self, suffix: &str) -> PathBuf {
        let mut path = self.stem.clone().into_os_string();
        path.push(".");
        path.push(suffix);
        PathBuf::from(path)
    }

    /// Raw image as delivered by the scanner.
    pub fn raw_image(&self) -> PathBuf {
        self.artifact("png")
    }

    /// Deskewed, tone-normalised image on the page canvas.
    pub fn optimized_image(&self) -> PathBuf {
        self.artifact("opt.png")
    }

    /// Intermediate ImageMagick pixel cache.
    pub fn intermediate(&self) -> PathBuf {
        self.artifact("mpc")
    }

    /// High-contrast text isolation raster.
    pub fn ocr_image(&self) -> PathBuf {
        self.artifact("ocr.png")
    }

    /// Final image handed to the OCR engine and embedded in the page PDF.
    pub fn ocr_input(&self) -> PathBuf {
        self.artifact("ocr-opt.png")
    }

    pub fn hocr(&self) -> PathBuf {
        self.artifact("hocr")
    }

    pub fn pdf(&self) -> PathBuf {
        self.artifact("pdf")
    }
}

impl fmt::Display for PageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name().to_string_lossy())
    }
}

/// What to do when an external tool exits non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Log the failure and carry on with whatever the tool left behind.
    #[default]
    BestEffort,
    /// Stop the page (or the assembly) and report the failure.
    FailFast,
}

/// SANE colour mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    #[default]
    Color,
    Gray,
    Lineart,
}

impl ColorMode {
    /// Value for the `--mode` option of `scanimage`.
    pub fn sane_value(&self) -> &'static str {
        match self {
            Self::Color => "Color",
            Self::Gray => "Gray",
            Self::Lineart => "Lineart",
        }
    }
}

/// Scan window in millimetres, measured from the top-left corner of the
/// scanner bed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanArea {
    pub left_mm: f64,
    pub top_mm: f64,
    pub right_mm: f64,
    pub bottom_mm: f64,
}

impl ScanArea {
    pub fn width_mm(&self) -> f64 {
        self.right_mm - self.left_mm
    }

    pub fn height_mm(&self) -> f64 {
        self.bottom_mm - self.top_mm
    }
}

impl Default for ScanArea {
    fn default() -> Self {
        Self {
            left_mm: 2.0,
            top_mm: 2.0,
            right_mm: 206.0,
            bottom_mm: 293.0,
        }
    }
}
