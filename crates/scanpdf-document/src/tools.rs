// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// External tool invocation. Commands are argument vectors handed straight to
// the OS; nothing goes through a shell.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::future::Future;
use std::io;
use std::process::Stdio;

use scanpdf_core::FailurePolicy;
use scanpdf_core::error::{Result, ScanPdfError};
use tokio::process::Command;
use tracing::{debug, warn};

/// One external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Exit status and diagnostics of a finished tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external tools. Abstracted so the pipeline can be driven without
/// ImageMagick or Ghostscript installed.
pub trait ToolRunner: Send + Sync + 'static {
    fn run(&self, command: &ToolCommand) -> impl Future<Output = io::Result<ToolOutput>> + Send;
}

/// Runs tools as child processes of this one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    async fn run(&self, command: &ToolCommand) -> io::Result<ToolOutput> {
        debug!(%command, "Running tool");
        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .output()
            .await?;
        Ok(ToolOutput {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Run one pipeline step under `policy`.
///
/// Returns `Ok(true)` when the tool succeeded and `Ok(false)` when it failed
/// but the policy says to carry on. A tool that cannot be launched counts as
/// a failure with no exit code.
pub async fn run_step<R: ToolRunner>(
    runner: &R,
    command: &ToolCommand,
    policy: FailurePolicy,
) -> Result<bool> {
    let output = match runner.run(command).await {
        Ok(output) => output,
        Err(err) => ToolOutput {
            code: None,
            stderr: format!("failed to launch: {err}"),
        },
    };

    if output.success() {
        return Ok(true);
    }

    warn!(
        %command,
        code = ?output.code,
        stderr = %output.stderr.trim(),
        "Tool failed"
    );

    match policy {
        FailurePolicy::BestEffort => Ok(false),
        FailurePolicy::FailFast => Err(ScanPdfError::Tool {
            command: command.to_string(),
            code: output.code,
            stderr: output.stderr.trim().to_string(),
        }),
    }
}
