//! Error types for Freighter
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deployment operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Main error type for deployment operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// Source project directory does not exist
    #[error("project not found: {path}")]
    MissingProject { path: PathBuf },

    /// A fatal external tool exited with a non-zero status
    #[error("'{program}' failed with {status}")]
    ToolFailed { program: String, status: String },

    /// An external tool could not be spawned at all
    #[error("could not run '{program}': {source}")]
    ToolUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration file
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Required secret was not provided via the environment
    #[error("missing environment variable '{name}' - secrets are never stored in config")]
    MissingSecret { name: String },

    /// Invalid exclusion pattern
    #[error("invalid exclusion pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// FTP session error
    #[error("FTP error: {0}")]
    Ftp(#[from] suppaftp::FtpError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
