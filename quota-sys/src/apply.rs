// SPDX-License-Identifier: GPL-3.0-only

//! Group quota application for ephemeral volume directories

use std::path::Path;

use quota_types::StorageMedium;
use tracing::{debug, warn};

use crate::detect::detect_filesystem;
use crate::device::resolve_device;
use crate::error::{QuotaError, Result};
use crate::runner::{QuotaCommandRunner, SystemCommandRunner};

/// Applies XFS group quotas to ephemeral volume directories.
///
/// The kernel's quota table is the only state involved; the
/// applicator holds nothing but its command runner, and re-applying
/// the same limit is always safe.
pub struct XfsQuotaApplicator<R = SystemCommandRunner> {
    runner: R,
}

impl XfsQuotaApplicator<SystemCommandRunner> {
    /// Applicator backed by the real system tools.
    pub fn new() -> Self {
        Self {
            runner: SystemCommandRunner::new(),
        }
    }
}

impl Default for XfsQuotaApplicator<SystemCommandRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: QuotaCommandRunner> XfsQuotaApplicator<R> {
    /// Applicator with an injected command runner.
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    /// Enforce `limit_bytes` as both the soft and hard block limit
    /// for `fs_group` on the filesystem backing `dir`.
    ///
    /// Memory-backed volumes and requests without a tenant group are
    /// successful no-ops, short-circuiting before any device
    /// resolution or quota command runs. A failed return means the
    /// quota is NOT guaranteed; callers must not treat it as a soft
    /// warning.
    pub fn apply(
        &self,
        dir: &Path,
        medium: StorageMedium,
        fs_group: Option<u64>,
        limit_bytes: u64,
    ) -> Result<()> {
        if medium == StorageMedium::Memory {
            debug!(
                "Skipping quota application for memory-backed volume {}",
                dir.display()
            );
            return Ok(());
        }

        let kind = detect_filesystem(&self.runner, dir)?;
        if !kind.supports_group_quota() {
            return Err(QuotaError::UnsupportedFilesystem {
                dir: dir.to_path_buf(),
                fs_type: kind.type_token().to_string(),
            });
        }

        let Some(group) = fs_group else {
            // No isolation group was requested for this workload.
            debug!(
                "Skipping quota application for {}: no tenant group specified",
                dir.display()
            );
            return Ok(());
        };

        let device = resolve_device(&self.runner, dir)?;

        let output = self.runner.apply_quota(&device, group, limit_bytes)?;
        // The quota tool is happy to fail while still exiting zero,
        // likely due to its interactive shell heritage. Anything on
        // stderr fails the call regardless of exit status.
        if !output.success || !output.stderr.is_empty() {
            let diagnostic = output.stderr.trim().to_string();
            warn!(
                "Quota tool reported a problem for group {} on {}: {}",
                group, device, diagnostic
            );
            return Err(QuotaError::QuotaApplication {
                device,
                group,
                diagnostic,
            });
        }

        debug!(
            "Group quota applied: device={}, group={}, limit={}",
            device, group, limit_bytes
        );
        Ok(())
    }
}
