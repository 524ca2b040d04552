//! Build preparer (stage 1)
//!
//! Copies the project into the scratch directory minus development-only
//! paths, writes the production `.env`, provisions the runtime-writable
//! directories and runs the build toolchains. Dependency install and cache
//! clear are fatal; the asset build is best-effort.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::console;
use crate::error::{DeployError, DeployResult};
use crate::exclude::ExcludeSet;
use crate::toolchain::Toolchain;

/// Prepare a production build tree under `scratch` and return its path.
pub fn prepare_build(
    config: &Config,
    scratch: &Path,
    toolchain: &dyn Toolchain,
) -> DeployResult<PathBuf> {
    if !config.project.is_dir() {
        return Err(DeployError::MissingProject {
            path: config.project.clone(),
        });
    }

    let build_dir = scratch.join("build");
    console::status(&format!("📁 Copying project to {}", build_dir.display()));

    let excludes = ExcludeSet::new(&config.exclude)?;
    copy_tree(&config.project, &build_dir, &excludes)?;

    fs::write(build_dir.join(".env"), config.env_file_content() + "\n")?;
    console::status("✅ Production .env written");

    for dir in &config.runtime_dirs {
        fs::create_dir_all(build_dir.join(dir))?;
    }

    console::status("📦 Installing production dependencies...");
    toolchain.run(
        "composer",
        &["install", "--no-dev", "--optimize-autoloader", "--no-interaction"],
        &build_dir,
    )?;

    console::status("🏗️ Building assets...");
    let assets = toolchain
        .run("npm", &["install"], &build_dir)
        .and_then(|_| toolchain.run("npm", &["run", "build"], &build_dir));
    if let Err(e) = assets {
        console::warn(&format!("⚠️ Asset build failed, continuing without: {e}"));
    }

    toolchain.run("php", &["bin/console", "cache:clear", "--env=prod"], &build_dir)?;

    console::status("✅ Application prepared for production");
    Ok(build_dir)
}

/// Recursively copy `src` to `dst`, skipping excluded entries.
///
/// Entries are visited in sorted order; excluded directories are pruned
/// without descending into them.
pub fn copy_tree(src: &Path, dst: &Path, excludes: &ExcludeSet) -> DeployResult<()> {
    fs::create_dir_all(dst)?;
    copy_dir(src, src, dst, excludes)
}

fn copy_dir(root: &Path, dir: &Path, dst: &Path, excludes: &ExcludeSet) -> DeployResult<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let rel = path
            .strip_prefix(root)
            .expect("walked path is under the walk root");
        let is_dir = path.is_dir();

        if excludes.is_excluded(rel, is_dir) {
            continue;
        }

        let target = dst.join(rel);
        if is_dir {
            fs::create_dir_all(&target)?;
            copy_dir(root, &path, dst, excludes)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&path, &target)?;
        }
    }

    Ok(())
}
