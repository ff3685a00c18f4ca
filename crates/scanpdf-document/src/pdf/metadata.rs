// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document-info metadata, handed to Ghostscript as a pdfmark file.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Local};
use scanpdf_core::error::Result;
use tracing::debug;

/// Producer and creator recorded in every scanned document.
pub const PRODUCER: &str = "scan-pdf";

/// Metadata of a scanned document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
    /// `%Y%m%d%H%M%S` timestamp of the scan.
    pub modified: String,
    /// PDF date body without the `D:` prefix.
    pub created: String,
}

impl DocumentInfo {
    /// Derive the metadata from the title words given on the command line.
    ///
    /// A leading word of six to eight digits is a date (`YYMMDD`..`YYYYMMDD`).
    /// It becomes the creation date, right-padded with zeros to eight digits,
    /// and the remaining words form the subject. Otherwise the whole title is
    /// the subject and the document is dated today at midnight.
    pub fn from_title_words(words: &[String], author: impl Into<String>, now: DateTime<Local>) -> Self {
        let title = words.join(" ");

        let (subject, created) = match words.split_first() {
            Some((first, rest)) if is_date_word(first) => {
                (rest.join(" "), format!("{first:0<8}"))
            }
            _ => (title.clone(), now.format("%Y%m%d000000").to_string()),
        };

        Self {
            title,
            author: author.into(),
            subject,
            modified: now.format("%Y%m%d%H%M%S").to_string(),
            created,
        }
    }

    /// The pdfmark program setting the document-info dictionary.
    pub fn to_pdfmark(&self) -> String {
        format!(
            "[ /Title <FEFF{title}>\n\
             \x20 /Author <FEFF{author}>\n\
             \x20 /Subject <FEFF{subject}>\n\
             \x20 /Keywords ()\n\
             \x20 /ModDate (D:{modified})\n\
             \x20 /CreationDate (D:{created})\n\
             \x20 /Creator ({PRODUCER})\n\
             \x20 /Producer ({PRODUCER})\n\
             \x20 /DOCINFO pdfmark\n",
            title = utf16_hex(&self.title),
            author = utf16_hex(&self.author),
            subject = utf16_hex(&self.subject),
            modified = self.modified,
            created = self.created,
        )
    }

    pub fn write_pdfmark(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_pdfmark())?;
        debug!(path = %path.display(), "pdfmark written");
        Ok(())
    }
}

/// The whole word must be the date, so the `D:` string stays well formed.
fn is_date_word(word: &str) -> bool {
    (6..=8).contains(&word.len()) && word.bytes().all(|b| b.is_ascii_digit())
}

/// Lowercase hex of the UTF-16BE encoding of `text`.
pub fn utf16_hex(text: &str) -> String {
    let mut hex = String::with_capacity(text.len() * 4);
    for unit in text.encode_utf16() {
        let _ = write!(hex, "{unit:04x}");
    }
    hex
}

/// Full name of the user running the program.
///
/// Taken from the GECOS field of `/etc/passwd`, falling back to `$USER`.
pub fn current_author() -> String {
    let user = std::env::var("USER").unwrap_or_default();
    std::fs::read_to_string("/etc/passwd")
        .ok()
        .and_then(|passwd| gecos_name(&passwd, &user))
        .unwrap_or(user)
}

/// Full name of `user` in passwd-formatted `passwd`, if it has one.
pub fn gecos_name(passwd: &str, user: &str) -> Option<String> {
    if user.is_empty() {
        return None;
    }
    passwd
        .lines()
        .map(|line| line.split(':').collect::<Vec<_>>())
        .find(|fields| fields.first() == Some(&user))
        .and_then(|fields| fields.get(4).copied())
        .and_then(|gecos| gecos.split(',').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
