// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared plumbing for the `scan-pdf` and `pdf-watermark` binaries: argument
// parsing, logging setup, operator prompts and the document viewer.

pub mod cli;
pub mod logging;
pub mod prompt;
pub mod viewer;
