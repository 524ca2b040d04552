//! Shared fixtures and mocks for Freighter integration tests.

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;

use freighter::error::{DeployError, DeployResult};
use freighter::publish::RemoteSession;
use freighter::toolchain::Toolchain;

/// Write a file, creating parent directories.
pub fn touch(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// A source project shaped like the application: framework sources plus the
/// development-only clutter the preparer must leave behind.
pub fn fixture_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    touch(&root.join("app.php"), "<?php");
    touch(&root.join("composer.json"), "{}");
    touch(&root.join("src/Kernel.php"), "<?php class Kernel {}");
    touch(&root.join("public/index.php"), "<?php");
    touch(&root.join("templates/base.html.twig"), "<html></html>");

    touch(&root.join(".git/HEAD"), "ref: refs/heads/main");
    touch(&root.join("var/cache/prod/pools.php"), "<?php");
    touch(&root.join("var/log/dev.log"), "log");
    touch(&root.join("node_modules/left-pad/index.js"), "js");
    touch(&root.join("tests/KernelTest.php"), "<?php");
    touch(&root.join(".env.dev"), "APP_ENV=dev");
    touch(&root.join(".env.test"), "APP_ENV=test");
    touch(&root.join("compose.yaml"), "services: {}");

    dir
}

/// Recorded external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

/// Toolchain double: records calls, fails the programs it is told to fail.
#[derive(Default)]
pub struct MockToolchain {
    pub fail_programs: HashSet<String>,
    pub calls: Mutex<Vec<ToolCall>>,
}

impl MockToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(programs: &[&str]) -> Self {
        Self {
            fail_programs: programs.iter().map(|s| s.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn programs_run(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.program.clone())
            .collect()
    }
}

impl Toolchain for MockToolchain {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> DeployResult<()> {
        self.calls.lock().unwrap().push(ToolCall {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            cwd: cwd.to_path_buf(),
        });
        if self.fail_programs.contains(program) {
            return Err(DeployError::ToolFailed {
                program: program.to_string(),
                status: "exit status: 1".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
struct SessionState {
    remote_entries: Vec<String>,
    fail_renames: HashSet<String>,
    ops: Vec<String>,
    stored: Vec<(String, Vec<u8>)>,
}

/// Remote session double with a scripted remote directory listing.
///
/// Uses `Arc<Mutex<_>>` internally so a test can keep a clone for
/// assertions after the pipeline consumed the session.
#[derive(Clone, Default)]
pub struct MockSession {
    inner: std::sync::Arc<Mutex<SessionState>>,
}

impl MockSession {
    pub fn with_entries(entries: &[&str]) -> Self {
        let session = Self::default();
        session.inner.lock().unwrap().remote_entries =
            entries.iter().map(|s| s.to_string()).collect();
        session
    }

    pub fn fail_rename_of(&self, entry: &str) {
        self.inner
            .lock()
            .unwrap()
            .fail_renames
            .insert(entry.to_string());
    }

    pub fn ops(&self) -> Vec<String> {
        self.inner.lock().unwrap().ops.clone()
    }

    pub fn stored(&self) -> Vec<(String, Vec<u8>)> {
        self.inner.lock().unwrap().stored.clone()
    }

    pub fn stored_names(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .stored
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl RemoteSession for MockSession {
    fn cwd(&mut self, dir: &str) -> DeployResult<()> {
        self.inner.lock().unwrap().ops.push(format!("cwd {dir}"));
        Ok(())
    }

    fn list(&mut self) -> DeployResult<Vec<String>> {
        let mut state = self.inner.lock().unwrap();
        state.ops.push("list".to_string());
        Ok(state.remote_entries.clone())
    }

    fn mkdir(&mut self, dir: &str) -> DeployResult<()> {
        self.inner.lock().unwrap().ops.push(format!("mkdir {dir}"));
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> DeployResult<()> {
        let mut state = self.inner.lock().unwrap();
        state.ops.push(format!("rename {from} -> {to}"));
        if state.fail_renames.contains(from) {
            return Err(DeployError::ToolFailed {
                program: "rename".to_string(),
                status: "550".to_string(),
            });
        }
        Ok(())
    }

    fn store(&mut self, remote_name: &str, reader: &mut dyn Read) -> DeployResult<()> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        let mut state = self.inner.lock().unwrap();
        state.ops.push(format!("store {remote_name}"));
        state.stored.push((remote_name.to_string(), buf));
        Ok(())
    }

    fn quit(&mut self) -> DeployResult<()> {
        self.inner.lock().unwrap().ops.push("quit".to_string());
        Ok(())
    }
}
