//! Freighter CLI - production deployment pipeline
//!
//! Usage: freighter [--yes]
//!
//! Reads `freighter.toml` from the working directory (falling back to
//! defaults), pulls secrets from the environment, asks for confirmation
//! unless `--yes` is given, then runs the deployment pipeline.

use anyhow::Result;
use clap::Parser;
use dialoguer::Confirm;

use freighter::config::Config;
use freighter::pipeline::run_pipeline;
use freighter::publish::{FtpSession, SCRIPT_NAME};
use freighter::toolchain::SystemToolchain;

/// Freighter - packages the application and ships it to production over FTP
#[derive(Parser, Debug)]
#[command(name = "freighter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_or_default(std::path::Path::new("freighter.toml"))?
        .with_env_secrets()?;

    if !cli.yes {
        let confirmed = Confirm::new()
            .with_prompt("🤔 Deploy to production?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("❌ Deployment cancelled");
            return Ok(());
        }
    }

    let summary = run_pipeline(&config, &SystemToolchain, |settings| {
        FtpSession::connect(settings)
    })?;

    if !summary.backup.is_complete() {
        println!(
            "⚠ Backup '{}' is incomplete, {} entries were left in place:",
            summary.backup.folder,
            summary.backup.failed.len()
        );
        for (item, reason) in &summary.backup.failed {
            println!("  - {item}: {reason}");
        }
    }

    if !config.site_url.is_empty() {
        println!("🌐 Application available at: {}", config.site_url);
    }
    println!("ℹ️  Connect over SSH to run the extraction script:");
    println!("   cd {}", config.ftp.remote_dir);
    println!("   chmod +x {SCRIPT_NAME} && ./{SCRIPT_NAME}");

    Ok(())
}
