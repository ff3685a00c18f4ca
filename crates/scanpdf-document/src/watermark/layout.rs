// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Watermark layout: standard font metrics, WinAnsi text encoding and the
// tiling of the watermark text across the page width.

use std::fmt;
use std::str::FromStr;

use scanpdf_core::PaperSize;
use scanpdf_core::error::{Result, ScanPdfError};
use serde::{Deserialize, Serialize};

/// The standard Type1 text fonts every PDF viewer provides.
///
/// Symbol and ZapfDingbats are left out: their built-in encodings have no
/// Latin letters, so a watermark set in them would not read as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandardFont {
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
}

impl StandardFont {
    /// PostScript name used as `/BaseFont`.
    pub fn base_name(&self) -> &'static str {
        match self {
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::TimesItalic => "Times-Italic",
            Self::TimesBoldItalic => "Times-BoldItalic",
        }
    }

    const ALL: [Self; 12] = [
        Self::Courier,
        Self::CourierBold,
        Self::CourierOblique,
        Self::CourierBoldOblique,
        Self::Helvetica,
        Self::HelveticaBold,
        Self::HelveticaOblique,
        Self::HelveticaBoldOblique,
        Self::TimesRoman,
        Self::TimesBold,
        Self::TimesItalic,
        Self::TimesBoldItalic,
    ];

    /// Advance width of a WinAnsi code in 1/1000 em.
    fn glyph_width(&self, code: u8) -> u16 {
        match self {
            Self::Courier | Self::CourierBold | Self::CourierOblique | Self::CourierBoldOblique => {
                600
            }
            Self::Helvetica | Self::HelveticaOblique => table_width(&HELVETICA, code, 350, 556),
            Self::HelveticaBold | Self::HelveticaBoldOblique => {
                table_width(&HELVETICA_BOLD, code, 350, 556)
            }
            Self::TimesRoman => table_width(&TIMES_ROMAN, code, 350, 500),
            Self::TimesBold => table_width(&TIMES_BOLD, code, 350, 500),
            Self::TimesItalic => table_width(&TIMES_ITALIC, code, 350, 500),
            Self::TimesBoldItalic => table_width(&TIMES_BOLD_ITALIC, code, 350, 500),
        }
    }
}

impl FromStr for StandardFont {
    type Err = ScanPdfError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|font| font.base_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ScanPdfError::UnsupportedFont(s.to_string()))
    }
}

impl fmt::Display for StandardFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_name())
    }
}

const BULLET: u8 = 0x95;

fn table_width(table: &[u16; 95], code: u8, bullet: u16, fallback: u16) -> u16 {
    match code {
        0x20..=0x7e => table[(code - 0x20) as usize],
        BULLET => bullet,
        _ => fallback,
    }
}

// AFM advance widths for codes 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

#[rustfmt::skip]
const TIMES_ITALIC: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 675, 675, 675, 500,
    920, 611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389, 278, 389, 422, 500,
    333, 500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500,
    500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

#[rustfmt::skip]
const TIMES_BOLD_ITALIC: [u16; 95] = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    832, 667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889, 722, 722,
    611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611, 333, 278, 333, 570, 500,
    333, 500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778, 556, 500,
    500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389, 348, 220, 348, 570,
];

/// Encode `text` in WinAnsiEncoding. Characters the encoding lacks become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => BULLET,
            '–' => 0x96,
            '—' => 0x97,
            '\u{a0}'..='\u{ff}' => c as u8,
            _ => b'?',
        })
        .collect()
}

/// Width of `text` in points when set in `font` at `size`.
pub fn text_width(text: &str, font: StandardFont, size: f32) -> f32 {
    let units: u32 = encode_win_ansi(text)
        .into_iter()
        .map(|code| u32::from(font.glyph_width(code)))
        .sum();
    units as f32 * size / 1000.0
}

/// Appearance of the watermark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkStyle {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// Opacity from 0 (invisible) to 1 (opaque).
    pub alpha: f32,
    pub font: StandardFont,
    pub font_size: f32,
    pub page_size: PaperSize,
    pub separator_char: char,
    pub separator_repeat: usize,
    /// Distance from the page edges in points.
    pub margin: f32,
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            red: 0,
            green: 0,
            blue: 0,
            alpha: 0.6,
            font: StandardFont::CourierBold,
            font_size: 16.0,
            page_size: PaperSize::A4,
            separator_char: '•',
            separator_repeat: 3,
            margin: 10.0,
        }
    }
}

impl WatermarkStyle {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ScanPdfError::InvalidSetting(format!(
                "alpha must be between 0 and 1, got {}",
                self.alpha
            )));
        }
        if !(self.font_size > 0.0 && self.font_size.is_finite()) {
            return Err(ScanPdfError::InvalidSetting(format!(
                "font size must be positive, got {}",
                self.font_size
            )));
        }
        if !(self.margin >= 0.0 && self.margin.is_finite()) {
            return Err(ScanPdfError::InvalidSetting(format!(
                "margin must not be negative, got {}",
                self.margin
            )));
        }
        Ok(())
    }

    /// Fill colour as PDF `rg` operands.
    pub fn rgb(&self) -> [f32; 3] {
        [self.red, self.green, self.blue].map(|c| f32::from(c) / 255.0)
    }
}

/// One tiled watermark line and its rendered width.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkLine {
    pub text: String,
    pub width: f32,
}

/// Lay out the watermark line.
///
/// The base tile is `sep   watermark   sep`; further `   watermark   sep`
/// segments are appended while the line plus both margins is narrower than
/// the page.
pub fn tile_text(watermark: &str, style: &WatermarkStyle) -> WatermarkLine {
    const BLANKS: &str = "   ";

    let separator: String = std::iter::repeat_n(style.separator_char, style.separator_repeat).collect();
    let mut text = format!("{separator}{BLANKS}{watermark}{BLANKS}{separator}");
    let addition = format!("{BLANKS}{watermark}{BLANKS}{separator}");

    let (page_width, _) = style.page_size.dimensions_pt();
    let add_width = text_width(&addition, style.font, style.font_size);
    let mut width = text_width(&text, style.font, style.font_size);

    if add_width > 0.0 {
        while width + 2.0 * style.margin < page_width {
            text.push_str(&addition);
            width += add_width;
        }
    }

    WatermarkLine { text, width }
}

/// Baseline origins of the bottom and top watermark lines.
pub fn placements(line: &WatermarkLine, style: &WatermarkStyle) -> [(f32, f32); 2] {
    let (page_width, page_height) = style.page_size.dimensions_pt();
    let x = (page_width - line.width) / 2.0;
    [
        (x, style.margin),
        (x, page_height - style.font_size - style.margin),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_names_round_trip() {
        for font in StandardFont::ALL {
            assert_eq!(font.base_name().parse::<StandardFont>().unwrap(), font);
        }
        assert_eq!("courier-bold".parse::<StandardFont>().unwrap(), StandardFont::CourierBold);
        assert_eq!("Times-BoldItalic".parse::<StandardFont>().unwrap(), StandardFont::TimesBoldItalic);
        for name in ["Comic-Sans", "Symbol", "ZapfDingbats"] {
            assert!(matches!(
                name.parse::<StandardFont>(),
                Err(ScanPdfError::UnsupportedFont(_))
            ));
        }
    }

    #[test]
    fn times_variants_have_own_metrics() {
        // B=667 o=500 l=278 d=556
        assert_eq!(text_width("Bold", StandardFont::TimesBold, 1000.0), 2001.0);
        // I=333 n=500 k=444
        assert_eq!(text_width("Ink", StandardFont::TimesItalic, 1000.0), 1277.0);
        // W=889 e=444 b=500
        assert_eq!(text_width("Web", StandardFont::TimesBoldItalic, 1000.0), 1833.0);
        assert_eq!(text_width("•", StandardFont::TimesBold, 1000.0), 350.0);
    }

    #[test]
    fn courier_is_monospaced() {
        let width = text_width("•••   COPY   •••", StandardFont::CourierBold, 10.0);
        assert!((width - 16.0 * 6.0).abs() < 1e-3);
    }

    #[test]
    fn helvetica_metrics() {
        // H=722 e=556 l=222 l=222 o=556
        let width = text_width("Hello", StandardFont::Helvetica, 1000.0);
        assert!((width - 2278.0).abs() < 1e-2);
        assert_eq!(
            text_width("•", StandardFont::TimesRoman, 1000.0),
            350.0
        );
    }

    #[test]
    fn win_ansi_encoding() {
        assert_eq!(encode_win_ansi("A•ä€"), vec![b'A', 0x95, 0xe4, 0x80]);
        assert_eq!(encode_win_ansi("漢"), vec![b'?']);
    }

    #[test]
    fn tiling_fills_the_page() {
        let style = WatermarkStyle::default();
        let line = tile_text("COPY", &style);
        let (page_width, _) = style.page_size.dimensions_pt();

        assert!(line.width + 2.0 * style.margin >= page_width);
        assert!(line.text.starts_with("•••   COPY   •••"));
        // One segment fewer would not have been wide enough.
        let segment = text_width("   COPY   •••", style.font, style.font_size);
        assert!(line.width - segment + 2.0 * style.margin < page_width);
        assert!((line.width - text_width(&line.text, style.font, style.font_size)).abs() < 0.01);
    }

    #[test]
    fn wide_base_tile_is_not_extended() {
        let style = WatermarkStyle {
            font_size: 48.0,
            ..WatermarkStyle::default()
        };
        let watermark = "CONFIDENTIAL DOCUMENT DO NOT DISTRIBUTE";
        let line = tile_text(watermark, &style);
        assert_eq!(line.text, format!("•••   {watermark}   •••"));
    }

    #[test]
    fn empty_tile_terminates() {
        let style = WatermarkStyle {
            separator_repeat: 0,
            ..WatermarkStyle::default()
        };
        let line = tile_text("", &style);
        assert!(line.width + 2.0 * style.margin >= 595.0);
        assert!(line.text.chars().all(|c| c == ' '));
    }

    #[test]
    fn placements_center_lines() {
        let style = WatermarkStyle::default();
        let line = WatermarkLine {
            text: String::new(),
            width: 95.27,
        };
        let [bottom, top] = placements(&line, &style);
        assert!((bottom.0 - 250.0).abs() < 0.01);
        assert_eq!(bottom.1, 10.0);
        assert!((top.1 - (841.89 - 26.0)).abs() < 0.01);
    }

    #[test]
    fn style_validation() {
        assert!(WatermarkStyle::default().validate().is_ok());
        let bad = WatermarkStyle {
            alpha: 1.5,
            ..WatermarkStyle::default()
        };
        assert!(bad.validate().is_err());
        let bad = WatermarkStyle {
            font_size: 0.0,
            ..WatermarkStyle::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn colour_is_normalised() {
        let style = WatermarkStyle {
            red: 255,
            green: 0,
            blue: 51,
            ..WatermarkStyle::default()
        };
        assert_eq!(style.rgb(), [1.0, 0.0, 0.2]);
    }
}
