// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner abstraction. `traits` defines the capability the acquisition loop
// drives; `sane` implements it on top of the `scanimage` front-end.

pub mod sane;
pub mod traits;

pub use sane::{DeviceInfo, ScanimageDevice};
pub use traits::{ScanSource, ScannedPage};
