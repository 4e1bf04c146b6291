// SPDX-License-Identifier: GPL-3.0-only

//! Shared domain types for ephemeral volume quota enforcement
//!
//! This crate defines the value types passed between the quota
//! enforcement layer and its callers:
//!
//! - `StorageMedium` → what backs an ephemeral volume directory
//! - `FilesystemKind` → capability-detection result for a directory
//! - `QuotaReportEntry` → one parsed row of a quota report
//!
//! All of these are transient value objects built fresh per call; the
//! kernel's quota table is the only system of record.

pub mod filesystem;
pub mod medium;
pub mod report;

pub use filesystem::FilesystemKind;
pub use medium::StorageMedium;
pub use report::QuotaReportEntry;
