// SPDX-License-Identifier: GPL-3.0-only

//! Filesystem capability classification

use serde::{Deserialize, Serialize};

/// Ordered table of probe tokens for filesystems we can enforce group
/// quotas on. Adding a backend is one row here; the apply control
/// flow does not change.
const QUOTA_BACKENDS: &[(&str, FilesystemKind)] = &[("xfs", FilesystemKind::Xfs)];

/// Result of filesystem capability detection for a volume directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilesystemKind {
    /// XFS filesystem with group quota support
    Xfs,

    /// Detected type with no quota backend; carries the raw type
    /// token for diagnostics
    Unsupported(String),
}

impl FilesystemKind {
    /// Classify raw type-probe output.
    ///
    /// Matching is substring-based: `stat -f -c %T` output may carry
    /// quoting or trailing newlines depending on the tool version.
    pub fn classify(probe_output: &str) -> Self {
        for (token, kind) in QUOTA_BACKENDS {
            if probe_output.contains(token) {
                return kind.clone();
            }
        }
        Self::Unsupported(probe_output.trim().trim_matches('\'').to_string())
    }

    /// Check if this filesystem has a group quota backend.
    pub fn supports_group_quota(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// Raw filesystem type token, as reported by the probe.
    pub fn type_token(&self) -> &str {
        match self {
            Self::Xfs => "xfs",
            Self::Unsupported(raw) => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FilesystemKind;

    #[test]
    fn classifies_xfs_with_probe_noise() {
        assert_eq!(FilesystemKind::classify("xfs"), FilesystemKind::Xfs);
        assert_eq!(FilesystemKind::classify("'xfs'\n"), FilesystemKind::Xfs);
    }

    #[test]
    fn classifies_other_types_as_unsupported() {
        let kind = FilesystemKind::classify("'ext4'\n");
        assert_eq!(kind, FilesystemKind::Unsupported("ext4".to_string()));
        assert!(!kind.supports_group_quota());
        assert_eq!(kind.type_token(), "ext4");
    }

    #[test]
    fn xfs_supports_group_quota() {
        assert!(FilesystemKind::Xfs.supports_group_quota());
    }
}
