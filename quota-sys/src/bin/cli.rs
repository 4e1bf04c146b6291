// SPDX-License-Identifier: GPL-3.0-only

//! CLI wrapper around the quota-sys library for testing and manual operations

use anyhow::Result;
use clap::{Parser, Subcommand};
use quota_sys::quota_types::StorageMedium;
use quota_sys::{
    RunnerConfig, SystemCommandRunner, VerifyOptions, XfsQuotaApplicator, detect_filesystem,
    resolve_device, wait_for_applied, xfs_quota_available,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Privileged helper for local volume quota operations
#[derive(Parser)]
#[command(name = "quota-sys-cli")]
#[command(about = "CLI tool for local volume quota operations", long_about = None)]
struct Cli {
    /// Override the quota tool path
    #[arg(long)]
    quota_tool: Option<PathBuf>,

    /// Override the filesystem type probe tool path
    #[arg(long)]
    type_probe_tool: Option<PathBuf>,

    /// Override the device probe tool path
    #[arg(long)]
    device_probe_tool: Option<PathBuf>,

    /// Cap each external tool invocation, in seconds
    #[arg(long)]
    execution_timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the filesystem kind backing a volume directory
    Fstype {
        /// Directory backing the ephemeral volume
        volume_dir: PathBuf,
    },
    /// Resolve the block device backing a volume directory
    Device {
        /// Directory backing the ephemeral volume
        volume_dir: PathBuf,
    },
    /// Apply a group quota to the filesystem backing a volume directory
    Apply {
        /// Directory backing the ephemeral volume
        volume_dir: PathBuf,
        /// Tenant group ID to constrain; omitting it makes this a no-op
        #[arg(long)]
        fs_group: Option<u64>,
        /// Soft and hard limit, in bytes
        #[arg(long)]
        limit_bytes: u64,
        /// Volume is memory-backed
        #[arg(long)]
        memory: bool,
    },
    /// Poll until an applied quota is visible in the quota report
    Verify {
        /// Directory backing the ephemeral volume
        volume_dir: PathBuf,
        /// Tenant group ID to look for
        #[arg(long)]
        fs_group: u64,
        /// Expected hard limit, in bytes
        #[arg(long)]
        limit_bytes: u64,
        /// Seconds to keep polling
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
}

fn main() -> Result<()> {
    // Initialize tracing to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.quota_tool.is_none() && !xfs_quota_available() {
        warn!("xfs_quota not found in PATH; quota operations will fail");
    }

    let mut config = RunnerConfig::default();
    if let Some(path) = cli.type_probe_tool {
        config.stat_path = path;
    }
    if let Some(path) = cli.device_probe_tool {
        config.df_path = path;
    }
    if let Some(path) = cli.quota_tool {
        config.xfs_quota_path = path;
    }
    if let Some(secs) = cli.execution_timeout {
        config.execution_timeout = Some(Duration::from_secs(secs));
    }
    let runner = SystemCommandRunner::with_config(config);

    match cli.command {
        Commands::Fstype { volume_dir } => {
            let kind = detect_filesystem(&runner, &volume_dir)?;
            println!("{}", serde_json::to_string(&kind)?);
        }
        Commands::Device { volume_dir } => {
            let device = resolve_device(&runner, &volume_dir)?;
            println!("{}", serde_json::to_string(&device)?);
        }
        Commands::Apply {
            volume_dir,
            fs_group,
            limit_bytes,
            memory,
        } => {
            let medium = if memory {
                StorageMedium::Memory
            } else {
                StorageMedium::Default
            };
            let applicator = XfsQuotaApplicator::with_runner(runner);
            applicator.apply(&volume_dir, medium, fs_group, limit_bytes)?;
            println!("{{\"success\": true}}");
        }
        Commands::Verify {
            volume_dir,
            fs_group,
            limit_bytes,
            timeout,
        } => {
            let options = VerifyOptions {
                timeout: Duration::from_secs(timeout),
                ..Default::default()
            };
            let entry = wait_for_applied(&runner, &volume_dir, fs_group, limit_bytes, &options)?;
            println!("{}", serde_json::to_string(&entry)?);
        }
    }

    Ok(())
}
