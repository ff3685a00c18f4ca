// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF output: Ghostscript assembly and document-info metadata.

pub mod assemble;
pub mod metadata;

pub use assemble::{Assembler, output_path};
pub use metadata::DocumentInfo;
