// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Duplex reconciliation. The rear pass runs over the turned stack, so its
// pages arrive last sheet first. Reversing them and renaming into document
// naming makes a plain file-name sort interleave front and rear sides.

use scanpdf_core::PageRecord;
use scanpdf_core::error::Result;
use tracing::{debug, info, warn};

/// Every artifact suffix a page job may leave behind.
///
/// `cache` is the pixel data ImageMagick writes next to an `.mpc` file.
pub const ARTIFACT_SUFFIXES: [&str; 8] = [
    "png", "opt.png", "mpc", "cache", "ocr.png", "ocr-opt.png", "hocr", "pdf",
];

/// Merge the rear pass into the front pass.
///
/// Must only run after every page job has been joined, since it renames the
/// files those jobs write.
pub fn reconcile(front: Vec<PageRecord>, rear: Vec<PageRecord>) -> Result<Vec<PageRecord>> {
    let mut pages = front;

    for (position, page) in rear.into_iter().rev().enumerate() {
        let renamed = page.renumbered(position as u32 + 1);
        for suffix in ARTIFACT_SUFFIXES {
            let from = page.artifact(suffix);
            if from.exists() {
                std::fs::rename(&from, renamed.artifact(suffix))?;
            }
        }
        if !renamed.pdf().exists() {
            warn!(page = %renamed, "Rear page has no PDF");
        }
        debug!(from = %page, to = %renamed, "Rear page renamed");
        pages.push(renamed);
    }

    sort_pages(&mut pages);
    info!(pages = pages.len(), "Duplex pages reconciled");
    Ok(pages)
}

/// Order pages by file name, which with zero-padded indices is document order.
pub fn sort_pages(pages: &mut [PageRecord]) {
    pages.sort_by_key(|page| page.file_name());
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use scanpdf_core::Side;

    use super::*;

    fn touch(page: &PageRecord, suffix: &str, content: &str) {
        std::fs::write(page.artifact(suffix), content).unwrap();
    }

    fn names(pages: &[PageRecord]) -> Vec<String> {
        pages.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn interleaves_equal_passes() {
        let dir = tempfile::tempdir().unwrap();
        let front: Vec<_> = (1..=3).map(|i| PageRecord::new(dir.path(), Side::Front, i)).collect();
        let rear: Vec<_> = (1..=3).map(|i| PageRecord::new(dir.path(), Side::Rear, i)).collect();
        for (i, page) in rear.iter().enumerate() {
            touch(page, "png", &format!("r{}", i + 1));
            touch(page, "pdf", "");
        }

        let pages = reconcile(front, rear).unwrap();
        assert_eq!(
            names(&pages),
            [
                "page-000001-a",
                "page-000001-b",
                "page-000002-a",
                "page-000002-b",
                "page-000003-a",
                "page-000003-b",
            ]
        );

        // The last rear sheet scanned is the back of the first sheet.
        let read = |name: &str| std::fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(read("page-000001-b.png"), "r3");
        assert_eq!(read("page-000002-b.png"), "r2");
        assert_eq!(read("page-000003-b.png"), "r1");
        assert!(dir.path().join("page-000001-b.pdf").exists());
        assert!(!dir.path().join("rear-000001-b.png").exists());
    }

    #[test]
    fn surplus_front_pages_follow() {
        let dir = tempfile::tempdir().unwrap();
        let front: Vec<_> = (1..=3).map(|i| PageRecord::new(dir.path(), Side::Front, i)).collect();
        let rear = vec![PageRecord::new(dir.path(), Side::Rear, 1)];

        let pages = reconcile(front, rear).unwrap();
        assert_eq!(
            names(&pages),
            ["page-000001-a", "page-000001-b", "page-000002-a", "page-000003-a"]
        );
    }

    #[test]
    fn surplus_rear_pages_follow() {
        let dir = tempfile::tempdir().unwrap();
        let front = vec![PageRecord::new(dir.path(), Side::Front, 1)];
        let rear: Vec<_> = (1..=3).map(|i| PageRecord::new(dir.path(), Side::Rear, i)).collect();
        for (i, page) in rear.iter().enumerate() {
            touch(page, "png", &format!("r{}", i + 1));
        }

        let pages = reconcile(front, rear).unwrap();
        assert_eq!(
            names(&pages),
            ["page-000001-a", "page-000001-b", "page-000002-b", "page-000003-b"]
        );
        let read = |name: &str| std::fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(read("page-000003-b.png"), "r1");
    }

    #[test]
    fn sort_is_by_file_name() {
        let dir = Path::new("/x");
        let mut pages = vec![
            PageRecord::new(dir, Side::Front, 10),
            PageRecord::new(dir, Side::Front, 2),
            PageRecord::interleaved(dir, Side::Rear, 2),
        ];
        sort_pages(&mut pages);
        assert_eq!(names(&pages), ["page-000002-a", "page-000002-b", "page-000010-a"]);
    }
}
