//! Deployment configuration
//!
//! Settings come from an optional `freighter.toml` next to the project, with
//! built-in defaults for everything that is not a secret. Secrets are never
//! read from the file: the FTP password must come from
//! `FREIGHTER_FTP_PASSWORD`, and `FREIGHTER_DATABASE_URL` /
//! `FREIGHTER_APP_SECRET` override the matching production env entries.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DeployError, DeployResult};

/// Environment variable holding the FTP password (required).
pub const FTP_PASSWORD_VAR: &str = "FREIGHTER_FTP_PASSWORD";

/// Environment variable overriding the production `DATABASE_URL`.
pub const DATABASE_URL_VAR: &str = "FREIGHTER_DATABASE_URL";

/// Environment variable overriding the production `APP_SECRET`.
pub const APP_SECRET_VAR: &str = "FREIGHTER_APP_SECRET";

/// FTP connection settings for the production host.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Filled from the environment, never from the config file.
    #[serde(skip)]
    pub password: String,
    /// Target directory on the remote host.
    pub remote_dir: String,
}

impl Default for FtpSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 21,
            user: String::new(),
            password: String::new(),
            remote_dir: String::new(),
        }
    }
}

/// One `KEY=value` line in the generated production `.env`.
///
/// Kept as a list rather than a map so the generated file preserves
/// definition order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnvEntry {
    pub key: String,
    pub value: String,
}

impl EnvEntry {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Full deployment configuration for one run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the application source tree.
    pub project: PathBuf,

    pub ftp: FtpSettings,

    /// Production env entries, written to `.env` in definition order.
    pub env: Vec<EnvEntry>,

    /// Development-only paths excluded from the build copy
    /// (gitignore semantics).
    pub exclude: Vec<String>,

    /// Runtime-writable directories: provisioned empty in the build tree,
    /// excluded from the archive.
    pub runtime_dirs: Vec<String>,

    /// Public URL shown in operator instructions after a successful run.
    pub site_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: PathBuf::from("."),
            ftp: FtpSettings::default(),
            env: default_env(),
            exclude: default_exclusions(),
            runtime_dirs: default_runtime_dirs(),
            site_url: String::new(),
        }
    }
}

fn default_env() -> Vec<EnvEntry> {
    vec![
        EnvEntry::new("APP_ENV", "prod"),
        EnvEntry::new("APP_DEBUG", "false"),
        EnvEntry::new(
            "DATABASE_URL",
            "mysql://app@localhost:3306/app_prod?serverVersion=8.0",
        ),
        EnvEntry::new("MAILER_DSN", "smtp://localhost"),
        EnvEntry::new("APP_SECRET", ""),
    ]
}

fn default_exclusions() -> Vec<String> {
    [
        ".git/",
        "var/cache/",
        "var/log/",
        "var/sessions/",
        "node_modules/",
        "tests/",
        ".env.dev",
        ".env.test",
        "compose.yaml",
        "compose.override.yaml",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_runtime_dirs() -> Vec<String> {
    ["var/cache", "var/log", "var/sessions"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> DeployResult<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| DeployError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from `freighter.toml` if present, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> DeployResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Pull secrets in from the process environment.
    ///
    /// The FTP password is mandatory; database URL and app secret override
    /// the corresponding env entries when set.
    pub fn with_env_secrets(mut self) -> DeployResult<Self> {
        self.ftp.password =
            std::env::var(FTP_PASSWORD_VAR).map_err(|_| DeployError::MissingSecret {
                name: FTP_PASSWORD_VAR.to_string(),
            })?;

        if let Ok(url) = std::env::var(DATABASE_URL_VAR) {
            self.set_env_entry("DATABASE_URL", &url);
        }
        if let Ok(secret) = std::env::var(APP_SECRET_VAR) {
            self.set_env_entry("APP_SECRET", &secret);
        }

        Ok(self)
    }

    fn set_env_entry(&mut self, key: &str, value: &str) {
        if let Some(entry) = self.env.iter_mut().find(|e| e.key == key) {
            entry.value = value.to_string();
        } else {
            self.env.push(EnvEntry::new(key, value));
        }
    }

    /// Render the production `.env` content, one `KEY=value` per line in
    /// definition order.
    pub fn env_file_content(&self) -> String {
        self.env
            .iter()
            .map(|e| format!("{}={}", e.key, e.value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
