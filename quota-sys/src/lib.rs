// SPDX-License-Identifier: GPL-3.0-only

//! Low-level group quota enforcement for ephemeral volume directories
//!
//! Given a directory backing an ephemeral volume, this crate
//! configures the underlying filesystem so that writes beyond a
//! per-tenant limit are rejected by the kernel, not by the workload
//! or an application-level check. XFS group quotas are the one
//! supported mechanism today; capability detection is table-driven so
//! further backends slot in without changing the apply control flow.
//!
//! These operations require elevated privileges and should only be
//! called from privileged services.

pub mod apply;
pub mod detect;
pub mod device;
pub mod error;
pub mod runner;
pub mod verify;

#[cfg(test)]
pub(crate) mod test_support;

pub use apply::XfsQuotaApplicator;
pub use detect::detect_filesystem;
pub use device::{parse_fs_device, resolve_device};
pub use error::{QuotaError, Result};
pub use runner::{
    CommandOutput, QuotaCommandRunner, RunnerConfig, SystemCommandRunner, xfs_quota_available,
};
pub use verify::{VerifyOptions, parse_quota_report, wait_for_applied};

// Re-export the shared domain types for convenience
pub use quota_types;
