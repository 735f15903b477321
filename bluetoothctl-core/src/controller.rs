/*!
 * Device Controller
 * Single-shot bluetoothctl invocations and listing with graceful degradation
 */

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, error};

use crate::device::{parse_devices, Address, DeviceList};
use crate::error::ToolError;

pub const DEFAULT_EXECUTABLE: &str = "/usr/bin/bluetoothctl";
pub const DEFAULT_SCAN_TIMEOUT: u32 = 5;

/// Exit code reported when the tool could not be started at all.
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BluetoothctlConfig {
    pub path: PathBuf,
    /// Seconds, passed to the tool as `--timeout`.
    pub scan_timeout: u32,
}

impl Default for BluetoothctlConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_EXECUTABLE),
            scan_timeout: DEFAULT_SCAN_TIMEOUT,
        }
    }
}

/// Result of one bluetoothctl invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub succeeded: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl OperationOutcome {
    pub fn from_exit(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            succeeded: exit_code == 0,
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    fn launch_failure(err: &ToolError) -> Self {
        Self::from_exit(LAUNCH_FAILURE_EXIT_CODE, String::new(), err.to_string())
    }
}

/// Process-execution seam between the controller and the operating system.
pub trait CommandRunner {
    fn run(&self, executable: &Path, args: &[&str]) -> std::io::Result<OperationOutcome>;
}

/// Runs the executable as a blocking child process, capturing its output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, executable: &Path, args: &[&str]) -> std::io::Result<OperationOutcome> {
        let output = Command::new(executable).args(args).output()?;

        Ok(OperationOutcome::from_exit(
            output.status.code().unwrap_or(LAUNCH_FAILURE_EXIT_CODE),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        ))
    }
}

pub struct DeviceController {
    executable: PathBuf,
    scan_timeout: u32,
    runner: Box<dyn CommandRunner>,
}

impl DeviceController {
    pub fn new(config: &BluetoothctlConfig) -> Self {
        Self::with_runner(config, SystemRunner)
    }

    pub fn with_runner(config: &BluetoothctlConfig, runner: impl CommandRunner + 'static) -> Self {
        Self {
            executable: config.path.clone(),
            scan_timeout: config.scan_timeout,
            runner: Box::new(runner),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn scan_timeout(&self) -> u32 {
        self.scan_timeout
    }

    /// Discover nearby devices for `scan_timeout` seconds.
    pub fn scan(&self) -> OperationOutcome {
        let timeout = self.scan_timeout.to_string();
        self.execute(&["--timeout", &timeout, "scan", "on"])
    }

    /// Every device the adapter knows about.
    pub fn devices(&self) -> Result<DeviceList, ToolError> {
        self.list("devices")
    }

    pub fn paired_devices(&self) -> Result<DeviceList, ToolError> {
        self.list("paired-devices")
    }

    /// Like [`devices`](Self::devices), but a failing tool yields an empty list.
    pub fn list_available(&self) -> DeviceList {
        self.devices().unwrap_or_else(|e| {
            error!("listing available devices failed: {}", e);
            DeviceList::default()
        })
    }

    /// Like [`paired_devices`](Self::paired_devices), but a failing tool yields an empty list.
    pub fn list_paired(&self) -> DeviceList {
        self.paired_devices().unwrap_or_else(|e| {
            error!("listing paired devices failed: {}", e);
            DeviceList::default()
        })
    }

    pub fn connect(&self, address: &Address) -> OperationOutcome {
        self.execute(&["connect", address.as_str()])
    }

    pub fn disconnect(&self, address: &Address) -> OperationOutcome {
        self.execute(&["disconnect", address.as_str()])
    }

    pub fn pair(&self, address: &Address) -> OperationOutcome {
        self.execute(&["pair", address.as_str()])
    }

    /// Forget a device, revoking its pairing.
    pub fn remove(&self, address: &Address) -> OperationOutcome {
        self.execute(&["remove", address.as_str()])
    }

    pub fn trust(&self, address: &Address) -> OperationOutcome {
        self.execute(&["trust", address.as_str()])
    }

    pub fn untrust(&self, address: &Address) -> OperationOutcome {
        self.execute(&["untrust", address.as_str()])
    }

    pub fn info(&self, address: &Address) -> OperationOutcome {
        self.execute(&["info", address.as_str()])
    }

    fn list(&self, subcommand: &str) -> Result<DeviceList, ToolError> {
        let outcome = self.invoke(&[subcommand])?;
        if !outcome.succeeded {
            return Err(ToolError::Exit {
                command: self.describe(&[subcommand]),
                exit_code: outcome.exit_code,
                stderr: outcome.stderr,
            });
        }

        let devices = parse_devices(&outcome.stdout);
        debug!("{} reported {} device(s)", subcommand, devices.len());
        Ok(devices)
    }

    /// Run a single-shot command; a tool that cannot start is reported as a failed outcome.
    fn execute(&self, args: &[&str]) -> OperationOutcome {
        self.invoke(args).unwrap_or_else(|e| {
            error!("{}", e);
            OperationOutcome::launch_failure(&e)
        })
    }

    fn invoke(&self, args: &[&str]) -> Result<OperationOutcome, ToolError> {
        debug!("running {}", self.describe(args));

        let outcome = self
            .runner
            .run(&self.executable, args)
            .map_err(|source| ToolError::Launch {
                executable: self.executable.display().to_string(),
                source,
            })?;

        debug!(exit_code = outcome.exit_code, "{} finished", self.describe(args));
        Ok(outcome)
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.executable.display(), args.join(" "))
    }
}
