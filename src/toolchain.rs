//! External toolchain invocation
//!
//! The build preparer shells out to composer, npm and the framework console.
//! The `Toolchain` trait is the seam: the pipeline only sees "run this
//! program with these args in this directory", so tests can substitute a
//! recording implementation instead of spawning real processes.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{DeployError, DeployResult};

/// Runs external build tools in a working directory.
pub trait Toolchain {
    /// Run a program to completion; `Err` on spawn failure or non-zero exit.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> DeployResult<()>;
}

/// Toolchain that spawns real processes, inheriting stdio so tool output
/// reaches the operator.
pub struct SystemToolchain;

impl Toolchain for SystemToolchain {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> DeployResult<()> {
        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| DeployError::ToolUnavailable {
                program: program.to_string(),
                source: e,
            })?;

        if !status.success() {
            return Err(DeployError::ToolFailed {
                program: program.to_string(),
                status: status.to_string(),
            });
        }

        Ok(())
    }
}
