// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

/// Hand `path` to the desktop viewer and return without waiting for it.
pub fn open(program: &str, path: &Path) -> Result<()> {
    let child = Command::new(program)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to launch {program} for {}", path.display()))?;
    debug!(pid = child.id(), "Viewer started");
    Ok(())
}
