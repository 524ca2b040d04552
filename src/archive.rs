//! Archiver (stage 3)
//!
//! Packs the build tree into a gzip-compressed tar archive, skipping the
//! runtime-writable directories. Files are walked in sorted order so an
//! unchanged tree archives to the same entry set.

use std::fs;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tar::Builder;

use crate::console;
use crate::error::DeployResult;
use crate::exclude::ExcludeSet;

/// Fixed name of the uploaded archive.
pub const ARCHIVE_NAME: &str = "deployment.tar.gz";

/// Archive the build tree into `out_dir`, returning the archive path.
///
/// `runtime_dirs` are skipped; they exist on the remote side with their own
/// contents and permissions.
pub fn create_archive(
    build_dir: &Path,
    out_dir: &Path,
    runtime_dirs: &[String],
) -> DeployResult<PathBuf> {
    let excludes = ExcludeSet::new(runtime_dirs)?;
    let files = collect_files(build_dir, &excludes)?;

    let archive_path = out_dir.join(ARCHIVE_NAME);
    let file = fs::File::create(&archive_path)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = Builder::new(encoder);

    for rel in &files {
        builder.append_path_with_name(build_dir.join(rel), rel)?;
    }

    builder.into_inner()?.finish()?;
    console::status(&format!(
        "✅ Package created: {} ({} files)",
        archive_path.display(),
        files.len()
    ));
    Ok(archive_path)
}

/// Enumerate the files under `root` that belong in the archive, as sorted
/// root-relative paths.
pub fn collect_files(root: &Path, excludes: &ExcludeSet) -> DeployResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(root, root, excludes, &mut files)?;
    Ok(files)
}

fn walk(
    root: &Path,
    dir: &Path,
    excludes: &ExcludeSet,
    files: &mut Vec<PathBuf>,
) -> DeployResult<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let rel = path
            .strip_prefix(root)
            .expect("walked path is under the walk root")
            .to_path_buf();
        let is_dir = path.is_dir();

        if excludes.is_excluded(&rel, is_dir) {
            continue;
        }

        if is_dir {
            walk(root, &path, excludes, files)?;
        } else {
            files.push(rel);
        }
    }

    Ok(())
}
