// SPDX-License-Identifier: GPL-3.0-only

//! Block device resolution for volume directories

use std::path::Path;

use crate::error::{QuotaError, Result};
use crate::runner::QuotaCommandRunner;

/// Resolve the block device backing `dir`.
///
/// Never cached: a directory could be remounted between calls, so
/// resolution happens fresh each time.
pub fn resolve_device<R: QuotaCommandRunner>(runner: &R, dir: &Path) -> Result<String> {
    let output = runner
        .fs_device(dir)
        .map_err(|err| QuotaError::DeviceProbe {
            dir: dir.to_path_buf(),
            reason: err.to_string(),
        })?;

    if !output.success {
        return Err(QuotaError::DeviceProbe {
            dir: dir.to_path_buf(),
            reason: output.stderr.trim().to_string(),
        });
    }

    parse_fs_device(&output.stdout)
}

/// Extract the device path from `df --output=source` style output.
///
/// The listing is not machine-oriented, so only the minimal stable
/// shape is assumed: a header line, then a data line whose first
/// whitespace-delimited token is the device path. Anything that does
/// not look like an absolute path is a parse failure, never a device.
pub fn parse_fs_device(df_output: &str) -> Result<String> {
    let mut lines = df_output.lines();
    let (Some(_header), Some(data)) = (lines.next(), lines.next()) else {
        return Err(QuotaError::MalformedDeviceOutput {
            output: df_output.to_string(),
        });
    };

    let candidate = data.split_whitespace().next().unwrap_or("");
    if !candidate.starts_with('/') {
        return Err(QuotaError::InvalidDevicePath {
            candidate: candidate.to_string(),
        });
    }

    Ok(candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubRunner, failed};

    #[test]
    fn parses_device_from_header_then_data() {
        let device = parse_fs_device("Filesystem\n/dev/sdb2\n").unwrap();
        assert_eq!(device, "/dev/sdb2");
    }

    #[test]
    fn takes_first_token_of_data_line() {
        let device = parse_fs_device("Filesystem     1K-blocks\n/dev/sdb2     52403200\n").unwrap();
        assert_eq!(device, "/dev/sdb2");
    }

    #[test]
    fn header_only_output_is_malformed() {
        let err = parse_fs_device("Filesystem\n").unwrap_err();
        assert!(matches!(err, QuotaError::MalformedDeviceOutput { .. }));
    }

    #[test]
    fn relative_looking_device_is_invalid() {
        let err = parse_fs_device("Filesystem\nnotadevice\n").unwrap_err();
        match err {
            QuotaError::InvalidDevicePath { candidate } => assert_eq!(candidate, "notadevice"),
            other => panic!("expected InvalidDevicePath, got {other:?}"),
        }
    }

    #[test]
    fn failing_probe_is_a_device_probe_error() {
        let runner = StubRunner::xfs().with_fs_device(failed("df: /gone: No such file or directory"));
        let err = resolve_device(&runner, Path::new("/gone")).unwrap_err();
        assert!(matches!(err, QuotaError::DeviceProbe { .. }));
    }
}
