// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test doubles for the scanner and the external tool chain.

use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use scanpdf_core::ScanParams;
use scanpdf_core::error::{Result, ScanPdfError};
use scanpdf_device::{ScanSource, ScannedPage};

use crate::tools::{ToolCommand, ToolOutput, ToolRunner};

/// Records every command. Programs listed in `failing` exit with status 1;
/// every other command "produces" its PDF output as an empty file so the
/// duplex rename has something to move.
#[derive(Default)]
pub struct RecordingRunner {
    failing: Vec<String>,
    commands: Mutex<Vec<ToolCommand>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(programs: &[&str]) -> Self {
        Self {
            failing: programs.iter().map(|p| p.to_string()).collect(),
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn commands(&self) -> Vec<ToolCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn count(&self, program: &str) -> usize {
        self.commands()
            .iter()
            .filter(|c| c.program() == program)
            .count()
    }
}

fn pdf_output(command: &ToolCommand) -> Option<PathBuf> {
    let args = command.arguments();
    let target = args
        .iter()
        .position(|a| a == "-o")
        .and_then(|i| args.get(i + 1))
        .or_else(|| args.last())?;
    let path = PathBuf::from(target);
    (path.extension()? == "pdf").then_some(path)
}

impl ToolRunner for RecordingRunner {
    async fn run(&self, command: &ToolCommand) -> io::Result<ToolOutput> {
        self.commands.lock().unwrap().push(command.clone());

        if self.failing.iter().any(|p| p == command.program()) {
            return Ok(ToolOutput {
                code: Some(1),
                stderr: format!("{}: simulated failure", command.program()),
            });
        }

        if command.program() != "gs" {
            if let Some(path) = pdf_output(command) {
                std::fs::write(path, b"")?;
            }
        }

        Ok(ToolOutput {
            code: Some(0),
            stderr: String::new(),
        })
    }
}

/// Scanner that replays a script of reads. Once the script runs out every
/// read reports an empty feeder.
#[derive(Default)]
pub struct ScriptedSource {
    script: VecDeque<Result<ScannedPage>>,
    pub reads: usize,
    pub cancels: usize,
    pub closed: bool,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<ScannedPage>>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    /// Convenience: pages whose PNG payload is the given label.
    pub fn pages(labels: &[&str]) -> Vec<Result<ScannedPage>> {
        labels
            .iter()
            .map(|label| Ok(ScannedPage::png(label.as_bytes().to_vec())))
            .collect()
    }
}

impl ScanSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    fn configure(&mut self, _params: &ScanParams) -> Result<()> {
        Ok(())
    }

    async fn read_page(&mut self) -> Result<ScannedPage> {
        if self.closed {
            return Err(ScanPdfError::Device("scanner already closed".into()));
        }
        self.reads += 1;
        self.script
            .pop_front()
            .unwrap_or(Err(ScanPdfError::FeederEmpty))
    }

    async fn cancel(&mut self) -> Result<()> {
        self.cancels += 1;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
