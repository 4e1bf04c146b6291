// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;
use thiserror::Error;

/// Error types for quota operations
#[derive(Error, Debug)]
pub enum QuotaError {
    /// External tool could not be run at all: spawn failure or
    /// execution timeout. Nonzero exits are reported per operation.
    #[error("failed to run `{command}`: {reason}")]
    ProcessExecution { command: String, reason: String },

    #[error("unable to check filesystem type for volume directory {}: {reason}", dir.display())]
    FilesystemProbe { dir: PathBuf, reason: String },

    #[error("{} is on a {fs_type} filesystem, which does not support local volume quota", dir.display())]
    UnsupportedFilesystem { dir: PathBuf, fs_type: String },

    #[error("unable to find filesystem device for volume directory {}: {reason}", dir.display())]
    DeviceProbe { dir: PathBuf, reason: String },

    #[error("unexpected line count in device listing output: {output:?}")]
    MalformedDeviceOutput { output: String },

    #[error("found invalid filesystem device: {candidate:?}")]
    InvalidDevicePath { candidate: String },

    #[error("quota tool reported a problem for group {group} on {device}: {diagnostic}")]
    QuotaApplication {
        device: String,
        group: u64,
        diagnostic: String,
    },

    #[error("malformed quota report line: {line:?}")]
    MalformedReportLine { line: String },

    #[error("quota for group {group} not observed within {timeout_secs}s")]
    QuotaNotObserved { group: u64, timeout_secs: u64 },
}

/// Result type alias for quota operations
pub type Result<T> = std::result::Result<T, QuotaError>;
