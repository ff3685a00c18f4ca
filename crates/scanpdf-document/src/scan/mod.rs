// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline: feeder passes, concurrent page processing, duplex
// reconciliation and the session that ties them together.

pub mod acquire;
pub mod duplex;
pub mod jobs;
pub mod process;
pub mod session;

pub use acquire::{PageFeed, acquire_pass};
pub use process::{PageOutcome, PageProcessor};
pub use session::{ScanSession, SessionOptions};
