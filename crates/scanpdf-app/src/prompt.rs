// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operator interaction on the terminal.

use std::io::{BufRead, Write};

use tracing::debug;

/// Print `message` and wait until the operator presses Enter.
///
/// Reading stdin blocks, so it runs on the blocking pool while page jobs keep
/// going. A closed stdin counts as confirmation.
pub async fn wait_for_enter(message: &str) {
    println!("{message}");
    if let Err(err) = std::io::stdout().flush() {
        debug!(error = %err, "Flushing prompt failed");
    }

    let read = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)
    })
    .await;

    match read {
        Ok(Ok(_)) => {}
        Ok(Err(err)) => debug!(error = %err, "Reading confirmation failed"),
        Err(err) => debug!(error = %err, "Prompt task failed"),
    }
}
