// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Watermark stamping: merge a two-line text overlay into every page of an
// existing PDF using the `lopdf` crate.

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use scanpdf_core::error::{Result, ScanPdfError};
use tracing::{debug, info, instrument};

use super::layout::{WatermarkLine, WatermarkStyle, encode_win_ansi, placements, tile_text};

/// Resource names the overlay refers to. Chosen to stay clear of the names
/// PDF producers usually generate.
const FONT_RESOURCE: &str = "WmF1";
const STATE_RESOURCE: &str = "WmGS";

/// How far up the page tree to look for inherited resources.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// `<dir>/<stem>.stamped.pdf` next to `input`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{stem}.stamped.pdf"))
}

/// Stamps a tiled text watermark at the top and bottom of every page.
pub struct Stamper {
    style: WatermarkStyle,
}

impl Stamper {
    pub fn new(style: WatermarkStyle) -> Result<Self> {
        style.validate()?;
        Ok(Self { style })
    }

    pub fn style(&self) -> &WatermarkStyle {
        &self.style
    }

    // -- File level -----------------------------------------------------------

    /// Stamp `input` and write the result to `output`. Returns the page count.
    #[instrument(skip(self), fields(input = %input.display(), output = %output.display()))]
    pub fn stamp_file(&self, input: &Path, output: &Path, watermark: &str) -> Result<usize> {
        if !input.is_file() {
            return Err(ScanPdfError::InputMissing(input.to_path_buf()));
        }

        let mut document = Document::load(input).map_err(|err| {
            ScanPdfError::Pdf(format!("failed to open {}: {}", input.display(), err))
        })?;

        let pages = self.stamp_document(&mut document, watermark)?;

        document.save(output).map_err(|err| {
            ScanPdfError::Pdf(format!("failed to write {}: {}", output.display(), err))
        })?;

        info!(pages, "Watermark applied");
        Ok(pages)
    }

    // -- Document level -------------------------------------------------------

    /// Add the overlay to every page of `document`. Returns the page count.
    ///
    /// Existing page content is wrapped in `q`/`Q` so the overlay starts from
    /// the default graphics state whatever the page left behind.
    pub fn stamp_document(&self, document: &mut Document, watermark: &str) -> Result<usize> {
        let line = tile_text(watermark, &self.style);
        debug!(width = line.width, chars = line.text.chars().count(), "Watermark laid out");

        let overlay = self.overlay_content(&line)?;
        let save_id = document.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let overlay_id = document.add_object(Stream::new(Dictionary::new(), overlay));
        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => self.style.font.base_name(),
            "Encoding" => "WinAnsiEncoding",
        });
        let state_id = document.add_object(dictionary! {
            "Type" => "ExtGState",
            "ca" => self.style.alpha,
            "CA" => self.style.alpha,
        });

        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        for &page_id in &page_ids {
            let existing = page_contents(document, page_id)?;
            let mut resources = page_resources(document, page_id)?;
            add_resource(document, &mut resources, b"Font", FONT_RESOURCE, font_id);
            add_resource(document, &mut resources, b"ExtGState", STATE_RESOURCE, state_id);

            let mut contents = Vec::with_capacity(existing.len() + 2);
            contents.push(Object::Reference(save_id));
            contents.extend(existing);
            contents.push(Object::Reference(overlay_id));

            let page = document
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .map_err(|err| ScanPdfError::Pdf(format!("page {:?} is not a dictionary: {}", page_id, err)))?;
            page.set("Contents", Object::Array(contents));
            page.set("Resources", Object::Dictionary(resources));
        }

        Ok(page_ids.len())
    }

    /// Content stream drawing both watermark lines.
    pub fn overlay_content(&self, line: &WatermarkLine) -> Result<Vec<u8>> {
        let [r, g, b] = self.style.rgb();
        let size = self.style.font_size;
        let text = encode_win_ansi(&line.text);

        let mut operations = vec![
            Operation::new("Q", vec![]),
            Operation::new("q", vec![]),
            Operation::new("gs", vec![Object::Name(STATE_RESOURCE.as_bytes().to_vec())]),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new("RG", vec![r.into(), g.into(), b.into()]),
        ];
        for (x, y) in placements(line, &self.style) {
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(FONT_RESOURCE.as_bytes().to_vec()), size.into()],
                ),
                Operation::new("Td", vec![x.into(), y.into()]),
                Operation::new("Tj", vec![Object::string_literal(text.clone())]),
                Operation::new("ET", vec![]),
            ]);
        }
        operations.push(Operation::new("Q", vec![]));

        let encoded = Content { operations }
            .encode()
            .map_err(|err| ScanPdfError::Pdf(format!("failed to encode overlay: {}", err)))?;

        // Separate from whatever the preceding stream ended with.
        let mut stream = Vec::with_capacity(encoded.len() + 1);
        stream.push(b'\n');
        stream.extend(encoded);
        Ok(stream)
    }
}

/// Content stream references of a page, in drawing order.
fn page_contents(document: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = page_dictionary(document, page_id)?;
    let contents = match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match document.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    Ok(contents)
}

/// The page's effective resource dictionary, resolving references and
/// inheritance from ancestor page-tree nodes.
fn page_resources(document: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut node_id = page_id;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        let node = page_dictionary(document, node_id)?;
        match node.get(b"Resources") {
            Ok(Object::Dictionary(resources)) => return Ok(resources.clone()),
            Ok(Object::Reference(id)) => {
                if let Ok(resources) = document.get_dictionary(*id) {
                    return Ok(resources.clone());
                }
            }
            _ => {}
        }
        match node.get(b"Parent") {
            Ok(Object::Reference(parent)) => node_id = *parent,
            _ => break,
        }
    }
    Ok(Dictionary::new())
}

fn page_dictionary(document: &Document, id: ObjectId) -> Result<&Dictionary> {
    document
        .get_dictionary(id)
        .map_err(|err| ScanPdfError::Pdf(format!("object {:?} is not a dictionary: {}", id, err)))
}

/// Register `target` as `name` in the `category` sub-dictionary, inlining a
/// referenced sub-dictionary so the shared original stays untouched.
fn add_resource(
    document: &Document,
    resources: &mut Dictionary,
    category: &[u8],
    name: &str,
    target: ObjectId,
) {
    let mut entries = match resources.get(category) {
        Ok(Object::Dictionary(entries)) => entries.clone(),
        Ok(Object::Reference(id)) => document
            .get_dictionary(*id)
            .cloned()
            .unwrap_or_else(|_| Dictionary::new()),
        _ => Dictionary::new(),
    };
    entries.set(name, Object::Reference(target));
    resources.set(category, Object::Dictionary(entries));
}
