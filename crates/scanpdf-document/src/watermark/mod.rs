// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text watermarks for existing PDFs.

pub mod layout;
pub mod stamp;

pub use layout::{StandardFont, WatermarkLine, WatermarkStyle, tile_text};
pub use stamp::{Stamper, default_output_path};
