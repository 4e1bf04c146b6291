// SPDX-License-Identifier: GPL-3.0-only

//! Eventual-consistency verification of applied quotas
//!
//! An applied limit can lag behind the apply command at the
//! filesystem/driver layer, so callers that need a hard guarantee
//! poll the quota report until the expected hard limit shows up or a
//! timeout elapses. Polling is a bounded retry of a read-only
//! observation; the mutating apply step is never retried here.

use std::path::Path;
use std::thread;
use std::time::Duration;

use quota_types::QuotaReportEntry;
use tracing::debug;

use crate::device::resolve_device;
use crate::error::{QuotaError, Result};
use crate::runner::QuotaCommandRunner;

/// The quota report lists block counts in 1 KiB units.
const REPORT_BLOCK_SIZE: u64 = 1024;

/// Polling bounds for [`wait_for_applied`].
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Total time to keep polling before giving up.
    pub timeout: Duration,

    /// Delay between report polls.
    pub poll_interval: Duration,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Poll the quota report for `group` on the device backing `dir`
/// until its hard limit equals `expected_hard_bytes`, or the timeout
/// elapses.
///
/// A report with no line for the group only means the group has not
/// reached the quota subsystem yet — the group may not appear until
/// its first quota write — so that case keeps polling. At most
/// `timeout / poll_interval` polls are performed.
pub fn wait_for_applied<R: QuotaCommandRunner>(
    runner: &R,
    dir: &Path,
    group: u64,
    expected_hard_bytes: u64,
    options: &VerifyOptions,
) -> Result<QuotaReportEntry> {
    let device = resolve_device(runner, dir)?;
    let expected_blocks = expected_hard_bytes / REPORT_BLOCK_SIZE;

    let interval = options.poll_interval.max(Duration::from_millis(1));
    let max_polls = (options.timeout.as_millis() / interval.as_millis()).max(1) as u64;

    for poll in 0..max_polls {
        let output = runner.quota_report(&device, group)?;
        // An unsuccessful report command is treated the same as a
        // missing line: not applied yet.
        if output.success {
            if let Some(entry) = parse_quota_report(&output.stdout, group)? {
                if entry.hard_blocks == expected_blocks {
                    debug!(
                        "Quota observed for group {} on {} after {} poll(s)",
                        group,
                        device,
                        poll + 1
                    );
                    return Ok(entry);
                }
            }
        }

        if poll + 1 < max_polls {
            thread::sleep(interval);
        }
    }

    Err(QuotaError::QuotaNotObserved {
        group,
        timeout_secs: options.timeout.as_secs(),
    })
}

/// Find the report line for `group` and parse it.
///
/// Lines of interest start with a `#<group>` token and must split
/// into exactly 6 whitespace-delimited fields: group ID, used, soft,
/// hard, warn, grace. `Ok(None)` means the group has no line in this
/// report. Raw report text never leaks past this routine.
pub fn parse_quota_report(report: &str, group: u64) -> Result<Option<QuotaReportEntry>> {
    let group_token = format!("#{group}");

    for line in report.lines() {
        if line.split_whitespace().next() != Some(group_token.as_str()) {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(QuotaError::MalformedReportLine {
                line: line.to_string(),
            });
        }

        let parse_blocks = |field: &str| {
            field
                .parse::<u64>()
                .map_err(|_| QuotaError::MalformedReportLine {
                    line: line.to_string(),
                })
        };

        return Ok(Some(QuotaReportEntry {
            group,
            used_blocks: parse_blocks(fields[1])?,
            soft_blocks: parse_blocks(fields[2])?,
            hard_blocks: parse_blocks(fields[3])?,
        }));
    }

    Ok(None)
}
