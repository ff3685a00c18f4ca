// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SANE backend driven through the `scanimage` command-line front-end.
//
// Every page read is one `scanimage` invocation; with `--source ADF` each call
// pulls the next sheet from the feeder. The image arrives on stdout as PNM.

use std::process::Stdio;

use scanpdf_core::ScanParams;
use scanpdf_core::error::{Result, ScanPdfError};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::traits::{ScanSource, ScannedPage};

/// `SANE_STATUS_NO_DOCS`, which `scanimage` uses as its exit status.
const NO_DOCS_EXIT_STATUS: i32 = 7;

/// Diagnostic printed by SANE backends when the feeder is empty.
const FEEDER_EMPTY_MARKER: &str = "out of documents";

/// `scanimage -f` format: device, vendor, model, type, one device per line.
const LIST_FORMAT: &str = "%d|%v|%m|%t%n";

/// A scanner reported by `scanimage -f`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// SANE device name, e.g. `hpaio:/net/HP_LaserJet_MFP_M277dw?ip=10.0.0.5`.
    pub device: String,
    pub vendor: String,
    pub model: String,
    /// Device type, e.g. `all-in-one`.
    pub kind: String,
}

/// Parse the output of `scanimage -f "%d|%v|%m|%t%n"`.
pub fn parse_device_list(output: &str) -> Vec<DeviceInfo> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.trim().splitn(4, '|');
            let device = fields.next()?.trim();
            if device.is_empty() {
                return None;
            }
            Some(DeviceInfo {
                device: device.to_string(),
                vendor: fields.next().unwrap_or_default().trim().to_string(),
                model: fields.next().unwrap_or_default().trim().to_string(),
                kind: fields.next().unwrap_or_default().trim().to_string(),
            })
        })
        .collect()
}

/// First device whose model name contains `name`.
pub fn select_device<'a>(devices: &'a [DeviceInfo], name: &str) -> Option<&'a DeviceInfo> {
    devices.iter().find(|info| info.model.contains(name))
}

/// Translate driver options into `scanimage` arguments.
pub fn scan_arguments(params: &ScanParams) -> Vec<String> {
    let area = &params.area;
    let mut args = vec![
        format!("--depth={}", params.depth),
        format!("--mode={}", params.mode.sane_value()),
        format!("--source={}", params.source),
        format!("--resolution={}", params.resolution),
    ];
    if let Some(compression) = &params.compression {
        args.push(format!("--compression={compression}"));
    }
    args.extend([
        format!("-l{}", area.left_mm),
        format!("-t{}", area.top_mm),
        format!("-x{}", area.width_mm()),
        format!("-y{}", area.height_mm()),
    ]);
    args
}

/// Scanner reached through `scanimage`.
pub struct ScanimageDevice {
    program: String,
    info: DeviceInfo,
    args: Vec<String>,
    pages_read: u32,
    closed: bool,
}

impl ScanimageDevice {
    /// Open the first scanner whose model name contains `name`.
    #[instrument(skip(program))]
    pub async fn open(program: &str, name: &str) -> Result<Self> {
        let devices = list_devices(program).await?;
        debug!(count = devices.len(), "Scanners listed");

        let info = select_device(&devices, name)
            .cloned()
            .ok_or_else(|| ScanPdfError::DeviceNotFound(name.to_string()))?;

        info!(
            "Selected scanner {} {} ({})",
            info.vendor, info.model, info.kind
        );

        Ok(Self {
            program: program.to_string(),
            info,
            args: scan_arguments(&ScanParams::default()),
            pages_read: 0,
            closed: false,
        })
    }
}

/// Enumerate attached scanners.
pub async fn list_devices(program: &str) -> Result<Vec<DeviceInfo>> {
    let output = Command::new(program)
        .arg("-f")
        .arg(LIST_FORMAT)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|err| ScanPdfError::Device(format!("failed to run {program}: {err}")))?;

    if !output.status.success() {
        return Err(ScanPdfError::Device(format!(
            "{program} could not list devices: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(parse_device_list(&String::from_utf8_lossy(&output.stdout)))
}

/// Map a finished `scanimage` run onto a page, the end-of-feed signal, or a
/// device error.
fn classify_output(code: Option<i32>, stdout: Vec<u8>, stderr: &str) -> Result<ScannedPage> {
    if code == Some(0) && !stdout.is_empty() {
        return Ok(ScannedPage::pnm(stdout));
    }
    if code == Some(NO_DOCS_EXIT_STATUS) || stderr.contains(FEEDER_EMPTY_MARKER) {
        return Err(ScanPdfError::FeederEmpty);
    }
    Err(ScanPdfError::Device(format!(
        "scanimage exited with {}: {}",
        code.map_or_else(|| "signal".to_string(), |c| c.to_string()),
        stderr.trim()
    )))
}

impl ScanSource for ScanimageDevice {
    fn name(&self) -> &str {
        &self.info.model
    }

    fn configure(&mut self, params: &ScanParams) -> Result<()> {
        if params.resolution == 0 {
            return Err(ScanPdfError::InvalidSetting(
                "scan resolution must be positive".into(),
            ));
        }
        self.args = scan_arguments(params);
        debug!(args = ?self.args, "Scanner configured");
        Ok(())
    }

    async fn read_page(&mut self) -> Result<ScannedPage> {
        if self.closed {
            return Err(ScanPdfError::Device("scanner already closed".into()));
        }

        let output = Command::new(&self.program)
            .arg(format!("--device-name={}", self.info.device))
            .args(&self.args)
            .arg("--format=pnm")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| ScanPdfError::Device(format!("failed to run {}: {err}", self.program)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let page = classify_output(output.status.code(), output.stdout, &stderr)?;
        self.pages_read += 1;
        debug!(bytes = page.data().len(), total = self.pages_read, "Page read");
        Ok(page)
    }

    async fn cancel(&mut self) -> Result<()> {
        // Each read is a complete process run, so there is never a scan left
        // in flight to abort.
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            info!(pages = self.pages_read, "Scanner released");
        } else {
            warn!("Scanner closed twice");
        }
        Ok(())
    }
}
