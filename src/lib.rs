//! Freighter - production deployment pipeline for a web application
//!
//! Freighter prepares a production build of the application (copy with
//! exclusions, generated `.env`, composer/npm/console toolchains), writes the
//! Apache rewrite rules, packs the result into a tar.gz archive and publishes
//! it to the production host over FTP, rotating the previous remote contents
//! into a timestamped backup folder.

pub mod archive;
pub mod config;
pub mod console;
pub mod error;
pub mod exclude;
pub mod htaccess;
pub mod pipeline;
pub mod prepare;
pub mod publish;
pub mod toolchain;

// Re-exports for convenience
pub use config::{Config, EnvEntry, FtpSettings};
pub use error::{DeployError, DeployResult};
pub use exclude::ExcludeSet;
pub use pipeline::{run_pipeline, DeploySummary};
pub use publish::{BackupReport, FtpSession, RemoteSession};
pub use toolchain::{SystemToolchain, Toolchain};
