//! Remote publisher (stage 4)
//!
//! Opens an authenticated FTP session, rotates the previous deployment into a
//! timestamped backup folder, uploads the archive and the extraction script,
//! then disconnects. The backup rotation is best-effort: per-entry rename
//! failures are collected and reported instead of aborting (or being
//! silently dropped); everything else in this stage is fatal.
//!
//! The extraction script is a deliverable only. The pipeline never executes
//! it; the operator runs it manually over SSH.

use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::Local;
use suppaftp::types::FileType;
use suppaftp::FtpStream;

use crate::archive::ARCHIVE_NAME;
use crate::config::FtpSettings;
use crate::console;
use crate::error::DeployResult;

/// Fixed remote name of the uploaded extraction script.
pub const SCRIPT_NAME: &str = "extract.sh";

/// The verbs the publisher needs from a remote file-transfer session.
///
/// `FtpSession` is the production implementation; tests substitute a
/// scripted one.
pub trait RemoteSession {
    /// Change into a remote directory.
    fn cwd(&mut self, dir: &str) -> DeployResult<()>;

    /// List entry names in the current remote directory.
    fn list(&mut self) -> DeployResult<Vec<String>>;

    /// Create a remote directory.
    fn mkdir(&mut self, dir: &str) -> DeployResult<()>;

    /// Rename (move) a remote entry.
    fn rename(&mut self, from: &str, to: &str) -> DeployResult<()>;

    /// Store binary content under a remote name.
    fn store(&mut self, remote_name: &str, reader: &mut dyn Read) -> DeployResult<()>;

    /// Close the session.
    fn quit(&mut self) -> DeployResult<()>;
}

/// FTP-backed session over `suppaftp`.
pub struct FtpSession {
    stream: FtpStream,
}

impl FtpSession {
    /// Connect and authenticate, switching to binary transfers.
    pub fn connect(settings: &FtpSettings) -> DeployResult<Self> {
        let mut stream = FtpStream::connect((settings.host.as_str(), settings.port))?;
        stream.login(&settings.user, &settings.password)?;
        stream.transfer_type(FileType::Binary)?;
        Ok(Self { stream })
    }
}

impl RemoteSession for FtpSession {
    fn cwd(&mut self, dir: &str) -> DeployResult<()> {
        Ok(self.stream.cwd(dir)?)
    }

    fn list(&mut self) -> DeployResult<Vec<String>> {
        Ok(self.stream.nlst(None)?)
    }

    fn mkdir(&mut self, dir: &str) -> DeployResult<()> {
        Ok(self.stream.mkdir(dir)?)
    }

    fn rename(&mut self, from: &str, to: &str) -> DeployResult<()> {
        Ok(self.stream.rename(from, to)?)
    }

    fn store(&mut self, remote_name: &str, reader: &mut dyn Read) -> DeployResult<()> {
        // reborrow: put_file needs a sized R, so hand it `&mut dyn Read`
        self.stream.put_file(remote_name, &mut &mut *reader)?;
        Ok(())
    }

    fn quit(&mut self) -> DeployResult<()> {
        Ok(self.stream.quit()?)
    }
}

/// Outcome of the backup rotation.
#[derive(Debug, Clone)]
pub struct BackupReport {
    /// Name of the timestamped remote backup folder.
    pub folder: String,
    /// Entries moved into the backup folder.
    pub moved: Vec<String>,
    /// Entries that could not be moved, with the reason. Reported, never
    /// fatal.
    pub failed: Vec<(String, String)>,
}

impl BackupReport {
    fn skipped(folder: String) -> Self {
        Self {
            folder,
            moved: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// True when every existing entry made it into the backup folder.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Move every existing remote entry into `folder`.
///
/// Folder creation and listing errors propagate (the caller downgrades them
/// to a warning); individual rename failures are collected in the report.
pub fn rotate_backup(session: &mut dyn RemoteSession, folder: &str) -> DeployResult<BackupReport> {
    session.mkdir(folder)?;
    console::status(&format!("📁 Backup folder created: {folder}"));

    let mut moved = Vec::new();
    let mut failed = Vec::new();
    for item in session.list()? {
        if item == folder || item == "." || item == ".." {
            continue;
        }
        match session.rename(&item, &format!("{folder}/{item}")) {
            Ok(()) => moved.push(item),
            Err(e) => failed.push((item, e.to_string())),
        }
    }

    Ok(BackupReport {
        folder: folder.to_string(),
        moved,
        failed,
    })
}

/// Shell script the operator runs on the remote host to finish the
/// deployment: extract the archive, fix permissions, run migrations.
pub fn extraction_script(remote_dir: &str) -> String {
    format!(
        r#"#!/bin/bash
cd {remote_dir}
tar -xzf {ARCHIVE_NAME}
rm {ARCHIVE_NAME}
chmod -R 755 public/
chmod -R 777 var/
php bin/console doctrine:migrations:migrate --no-interaction --env=prod
echo "Deployment complete!"
"#
    )
}

/// Upload the archive and extraction script, rotating the previous remote
/// contents into a backup folder first.
pub fn publish(
    session: &mut dyn RemoteSession,
    archive_path: &Path,
    settings: &FtpSettings,
) -> DeployResult<BackupReport> {
    session.cwd(&settings.remote_dir)?;

    let folder = format!("backup_{}", Local::now().format("%Y%m%d_%H%M%S"));
    let report = match rotate_backup(session, &folder) {
        Ok(report) => {
            for (item, reason) in &report.failed {
                console::warn(&format!("⚠️ Could not move '{item}' into backup: {reason}"));
            }
            report
        }
        Err(e) => {
            console::warn(&format!("⚠️ Could not create backup: {e}"));
            BackupReport::skipped(folder)
        }
    };

    console::status("📤 Uploading deployment package...");
    let mut archive = fs::File::open(archive_path)?;
    session.store(ARCHIVE_NAME, &mut archive)?;
    console::status("✅ Package uploaded");

    let script = extraction_script(&settings.remote_dir);
    session.store(SCRIPT_NAME, &mut script.as_bytes())?;

    session.quit()?;
    console::status("✅ FTP deployment finished");
    Ok(report)
}
