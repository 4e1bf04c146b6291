// SPDX-License-Identifier: GPL-3.0-only

//! In-memory command runner stand-ins for unit tests

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use crate::error::Result;
use crate::runner::{CommandOutput, QuotaCommandRunner};

pub fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        stdout: stdout.to_string(),
        stderr: String::new(),
        success: true,
    }
}

pub fn ok_with_stderr(stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        success: true,
    }
}

pub fn failed(stderr: &str) -> CommandOutput {
    CommandOutput {
        stdout: String::new(),
        stderr: stderr.to_string(),
        success: false,
    }
}

/// Per-operation invocation counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub fs_type: usize,
    pub fs_device: usize,
    pub apply_quota: usize,
    pub quota_report: usize,
}

/// Deterministic runner: fixed output per operation, plus a queue of
/// report outputs that advances one entry per poll (the last entry
/// repeats once the queue is drained).
pub struct StubRunner {
    counts: Mutex<CallCounts>,
    fs_type_output: CommandOutput,
    fs_device_output: CommandOutput,
    apply_output: CommandOutput,
    report_outputs: Mutex<VecDeque<CommandOutput>>,
}

impl StubRunner {
    /// Stub for a healthy XFS-backed volume directory on /dev/sdb2.
    pub fn xfs() -> Self {
        Self {
            counts: Mutex::default(),
            fs_type_output: ok("xfs\n"),
            fs_device_output: ok("Filesystem\n/dev/sdb2\n"),
            apply_output: ok(""),
            report_outputs: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_fs_type(mut self, output: CommandOutput) -> Self {
        self.fs_type_output = output;
        self
    }

    pub fn with_fs_device(mut self, output: CommandOutput) -> Self {
        self.fs_device_output = output;
        self
    }

    pub fn with_apply(mut self, output: CommandOutput) -> Self {
        self.apply_output = output;
        self
    }

    pub fn push_report(self, output: CommandOutput) -> Self {
        self.report_outputs.lock().unwrap().push_back(output);
        self
    }

    pub fn counts(&self) -> CallCounts {
        *self.counts.lock().unwrap()
    }
}

impl QuotaCommandRunner for StubRunner {
    fn fs_type(&self, _dir: &Path) -> Result<CommandOutput> {
        self.counts.lock().unwrap().fs_type += 1;
        Ok(self.fs_type_output.clone())
    }

    fn fs_device(&self, _dir: &Path) -> Result<CommandOutput> {
        self.counts.lock().unwrap().fs_device += 1;
        Ok(self.fs_device_output.clone())
    }

    fn apply_quota(&self, _device: &str, _group: u64, _limit_bytes: u64) -> Result<CommandOutput> {
        self.counts.lock().unwrap().apply_quota += 1;
        Ok(self.apply_output.clone())
    }

    fn quota_report(&self, _device: &str, _group: u64) -> Result<CommandOutput> {
        self.counts.lock().unwrap().quota_report += 1;
        let mut reports = self.report_outputs.lock().unwrap();
        let output = if reports.len() > 1 {
            reports.pop_front().unwrap()
        } else {
            reports.front().cloned().unwrap_or_else(|| ok(""))
        };
        Ok(output)
    }
}
