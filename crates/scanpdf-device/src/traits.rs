// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic scanner capability.

use std::future::Future;
use std::path::Path;

use image::ImageFormat;
use scanpdf_core::ScanParams;
use scanpdf_core::error::{Result, ScanPdfError};
use tracing::debug;

/// A document scanner with an automatic feeder.
///
/// Pages are pulled one at a time with [`read_page`](Self::read_page). An
/// empty feeder is reported as [`ScanPdfError::FeederEmpty`]; every other
/// error is a real device failure.
pub trait ScanSource: Send {
    /// Human-readable device name for logs.
    fn name(&self) -> &str;

    /// Apply driver options. Takes effect on the next page read.
    fn configure(&mut self, params: &ScanParams) -> Result<()>;

    /// Feed and scan the next sheet side.
    fn read_page(&mut self) -> impl Future<Output = Result<ScannedPage>> + Send;

    /// Abort any scan in progress.
    fn cancel(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Release the device. Further reads fail.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Encoded image data of one scanned page.
#[derive(Debug, Clone)]
pub struct ScannedPage {
    data: Vec<u8>,
    format: ImageFormat,
}

impl ScannedPage {
    pub fn new(data: Vec<u8>, format: ImageFormat) -> Self {
        Self { data, format }
    }

    /// Page already encoded as PNG.
    pub fn png(data: Vec<u8>) -> Self {
        Self::new(data, ImageFormat::Png)
    }

    /// Page in one of the portable anymap formats `scanimage` emits.
    pub fn pnm(data: Vec<u8>) -> Self {
        Self::new(data, ImageFormat::Pnm)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Persist the page as PNG, transcoding if the scanner delivered another
    /// format.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        if self.format == ImageFormat::Png {
            std::fs::write(path, &self.data)?;
            return Ok(());
        }

        let image = image::load_from_memory_with_format(&self.data, self.format).map_err(|err| {
            ScanPdfError::Image(format!("failed to decode scanned page: {}", err))
        })?;
        debug!(
            width = image.width(),
            height = image.height(),
            format = ?self.format,
            "Transcoding scanned page to PNG"
        );
        image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|err| {
                ScanPdfError::Image(format!("failed to write {}: {}", path.display(), err))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_is_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        ScannedPage::png(b"already encoded".to_vec())
            .save_png(&path)
            .unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"already encoded");
    }

    #[test]
    fn pnm_is_transcoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");

        // 3x2 binary greymap.
        let mut pgm = b"P5\n3 2\n255\n".to_vec();
        pgm.extend_from_slice(&[0, 64, 128, 192, 255, 32]);
        ScannedPage::pnm(pgm).save_png(&path).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), 3);
        assert_eq!(decoded.height(), 2);
    }

    #[test]
    fn garbage_pnm_is_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ScannedPage::pnm(b"not an image".to_vec()).save_png(&dir.path().join("x.png"));
        assert!(matches!(result, Err(ScanPdfError::Image(_))));
    }
}
