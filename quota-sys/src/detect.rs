// SPDX-License-Identifier: GPL-3.0-only

//! Filesystem capability detection for volume directories

use std::path::Path;

use quota_types::FilesystemKind;
use tracing::debug;

use crate::error::{QuotaError, Result};
use crate::runner::QuotaCommandRunner;

/// Determine which quota backend, if any, covers the filesystem
/// backing `dir`.
///
/// A successfully-detected type with no backend is an `Ok` value
/// carrying [`FilesystemKind::Unsupported`]; only a failing probe
/// command is an error here. The two cases are deliberately distinct:
/// an unsupported filesystem is a normal, reportable outcome.
pub fn detect_filesystem<R: QuotaCommandRunner>(runner: &R, dir: &Path) -> Result<FilesystemKind> {
    let output = runner
        .fs_type(dir)
        .map_err(|err| QuotaError::FilesystemProbe {
            dir: dir.to_path_buf(),
            reason: err.to_string(),
        })?;

    if !output.success {
        return Err(QuotaError::FilesystemProbe {
            dir: dir.to_path_buf(),
            reason: output.stderr.trim().to_string(),
        });
    }

    let kind = FilesystemKind::classify(&output.stdout);
    debug!("Detected filesystem for {}: {:?}", dir.display(), kind);
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubRunner, failed, ok};

    #[test]
    fn detects_xfs() {
        let runner = StubRunner::xfs();
        let kind = detect_filesystem(&runner, Path::new("/var/lib/volumes/v1")).unwrap();
        assert_eq!(kind, FilesystemKind::Xfs);
    }

    #[test]
    fn unsupported_type_is_a_normal_outcome() {
        let runner = StubRunner::xfs().with_fs_type(ok("'ext4'\n"));
        let kind = detect_filesystem(&runner, Path::new("/var/lib/volumes/v1")).unwrap();
        assert_eq!(kind, FilesystemKind::Unsupported("ext4".to_string()));
    }

    #[test]
    fn failing_probe_is_a_probe_error() {
        let runner = StubRunner::xfs().with_fs_type(failed("stat: cannot read file system information"));
        let err = detect_filesystem(&runner, Path::new("/var/lib/volumes/v1")).unwrap_err();
        assert!(matches!(err, QuotaError::FilesystemProbe { .. }));
    }
}
