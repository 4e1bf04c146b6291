// SPDX-License-Identifier: GPL-3.0-only

//! External quota tool invocation
//!
//! All shelling-out lives behind the [`QuotaCommandRunner`] trait so
//! the rest of the crate (and its tests) never touches a process
//! boundary directly.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;
use which::which;

use crate::error::{QuotaError, Result};

/// How often a deadline-bounded invocation checks for exit.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured output of one external tool invocation.
///
/// `Err` from a runner means the process could not be run at all. A
/// process that ran but exited nonzero comes back as
/// `success: false`, because each operation applies its own failure
/// policy — the apply path must additionally treat stderr content as
/// failure even on a zero exit.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// The external operations quota enforcement depends on.
pub trait QuotaCommandRunner {
    /// Probe the filesystem type backing `dir`.
    fn fs_type(&self, dir: &Path) -> Result<CommandOutput>;

    /// Probe the block device backing `dir`. Output is a tabular
    /// listing whose second line starts with the device path.
    fn fs_device(&self, dir: &Path) -> Result<CommandOutput>;

    /// Set the soft and hard block limits for `group` on `device`,
    /// both equal to `limit_bytes`.
    fn apply_quota(&self, device: &str, group: u64, limit_bytes: u64) -> Result<CommandOutput>;

    /// Report current quota state for `group` on `device`.
    fn quota_report(&self, device: &str, group: u64) -> Result<CommandOutput>;
}

/// Configuration for [`SystemCommandRunner`].
///
/// Tool path overrides let tests and alternate roots substitute
/// stand-in executables for the real system tools.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Filesystem type probe tool
    pub stat_path: PathBuf,

    /// Device probe tool
    pub df_path: PathBuf,

    /// Quota tool
    pub xfs_quota_path: PathBuf,

    /// Cap on each external invocation. `None` waits indefinitely.
    pub execution_timeout: Option<Duration>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            stat_path: PathBuf::from("stat"),
            df_path: PathBuf::from("df"),
            xfs_quota_path: PathBuf::from("xfs_quota"),
            execution_timeout: None,
        }
    }
}

/// Check whether the quota tool is present on this host.
pub fn xfs_quota_available() -> bool {
    which("xfs_quota").is_ok()
}

/// Runs the real system tools.
#[derive(Debug, Default)]
pub struct SystemCommandRunner {
    config: RunnerConfig,
}

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    fn run(&self, program: &Path, args: &[String]) -> Result<CommandOutput> {
        let rendered = render(program, args);
        debug!("Running: {}", rendered);

        match self.config.execution_timeout {
            None => {
                let output = Command::new(program).args(args).output().map_err(|e| {
                    QuotaError::ProcessExecution {
                        command: rendered,
                        reason: e.to_string(),
                    }
                })?;
                Ok(CommandOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                    success: output.status.success(),
                })
            }
            Some(timeout) => run_with_deadline(program, args, &rendered, timeout),
        }
    }
}

impl QuotaCommandRunner for SystemCommandRunner {
    fn fs_type(&self, dir: &Path) -> Result<CommandOutput> {
        self.run(
            &self.config.stat_path,
            &[
                "-f".to_string(),
                "-c".to_string(),
                "%T".to_string(),
                dir.display().to_string(),
            ],
        )
    }

    fn fs_device(&self, dir: &Path) -> Result<CommandOutput> {
        self.run(
            &self.config.df_path,
            &["--output=source".to_string(), dir.display().to_string()],
        )
    }

    fn apply_quota(&self, device: &str, group: u64, limit_bytes: u64) -> Result<CommandOutput> {
        self.run(
            &self.config.xfs_quota_path,
            &[
                "-x".to_string(),
                "-c".to_string(),
                format!("limit -g bsoft={limit_bytes} bhard={limit_bytes} {group}"),
                device.to_string(),
            ],
        )
    }

    fn quota_report(&self, device: &str, group: u64) -> Result<CommandOutput> {
        self.run(
            &self.config.xfs_quota_path,
            &[
                "-x".to_string(),
                "-c".to_string(),
                format!("report -n -L {group} -U {group}"),
                device.to_string(),
            ],
        )
    }
}

fn render(program: &Path, args: &[String]) -> String {
    let mut rendered = program.display().to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

/// Spawn and poll for exit, killing the child once the deadline
/// passes. Expiry is a process-execution failure, same as a tool that
/// could not be started.
fn run_with_deadline(
    program: &Path,
    args: &[String],
    rendered: &str,
    timeout: Duration,
) -> Result<CommandOutput> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| QuotaError::ProcessExecution {
            command: rendered.to_string(),
            reason: e.to_string(),
        })?;

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => break,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(QuotaError::ProcessExecution {
                        command: rendered.to_string(),
                        reason: format!("timed out after {:?}", timeout),
                    });
                }
                thread::sleep(WAIT_POLL_INTERVAL);
            }
            Err(e) => {
                return Err(QuotaError::ProcessExecution {
                    command: rendered.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|e| QuotaError::ProcessExecution {
            command: rendered.to_string(),
            reason: e.to_string(),
        })?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        success: output.status.success(),
    })
}
