//! Deployment pipeline
//!
//! Runs the five stages strictly in order: prepare, rewrite rules, archive,
//! publish, cleanup. The scratch directory is owned by a `TempDir` guard, so
//! it is removed on every exit path, including fatal stage failures.

use crate::archive;
use crate::config::{Config, FtpSettings};
use crate::console;
use crate::error::DeployResult;
use crate::htaccess;
use crate::prepare;
use crate::publish::{self, BackupReport, RemoteSession};
use crate::toolchain::Toolchain;

/// What the run accomplished, for operator reporting.
#[derive(Debug, Clone)]
pub struct DeploySummary {
    pub backup: BackupReport,
}

/// Run the full deployment pipeline.
///
/// `connect` opens the remote session once the archive is ready, so no
/// connection is made when an earlier stage fails.
pub fn run_pipeline<C, S>(
    config: &Config,
    toolchain: &dyn Toolchain,
    connect: C,
) -> DeployResult<DeploySummary>
where
    C: FnOnce(&FtpSettings) -> DeployResult<S>,
    S: RemoteSession,
{
    console::status("🚀 Starting deployment...");

    let result = run_stages(config, toolchain, connect);
    if let Err(e) = &result {
        console::warn(&format!("❌ Deployment failed: {e}"));
    }
    result
}

fn run_stages<C, S>(
    config: &Config,
    toolchain: &dyn Toolchain,
    connect: C,
) -> DeployResult<DeploySummary>
where
    C: FnOnce(&FtpSettings) -> DeployResult<S>,
    S: RemoteSession,
{
    // checked before the scratch dir exists, so a bad project path leaves
    // no trace on disk
    if !config.project.is_dir() {
        return Err(crate::error::DeployError::MissingProject {
            path: config.project.clone(),
        });
    }

    let scratch = tempfile::Builder::new()
        .prefix("freighter_deploy_")
        .tempdir()?;

    let build_dir = prepare::prepare_build(config, scratch.path(), toolchain)?;
    htaccess::write_rewrite_rules(&build_dir)?;
    let archive_path =
        archive::create_archive(&build_dir, scratch.path(), &config.runtime_dirs)?;

    console::status("🚀 Connecting to the remote host...");
    let mut session = connect(&config.ftp)?;
    let backup = publish::publish(&mut session, &archive_path, &config.ftp)?;

    console::status("🎉 Deployment finished successfully!");
    Ok(DeploySummary { backup })
}
