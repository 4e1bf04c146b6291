// SPDX-License-Identifier: GPL-3.0-only

//! Quota report rows

use serde::{Deserialize, Serialize};

/// One row of an `xfs_quota` group report.
///
/// Block counts are in the tool's 1 KiB units, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaReportEntry {
    /// Quota accounting group ID
    pub group: u64,

    /// Blocks currently used by the group
    pub used_blocks: u64,

    /// Soft block limit (warning threshold)
    pub soft_blocks: u64,

    /// Hard block limit (write-rejection boundary)
    pub hard_blocks: u64,
}
