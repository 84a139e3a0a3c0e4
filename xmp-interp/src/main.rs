//! xmp-interp - Main entry point
//!
//! Interpolates develop settings across the sidecars of one directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xmp_interp::{RampDriver, RunOptions, RunOutcome};
use xmp_interp_common::SettingsResolver;

/// Command-line arguments for xmp-interp
#[derive(Parser, Debug)]
#[command(name = "xmp-interp")]
#[command(about = "Spread a develop-settings ramp evenly across a sequence of sidecar files")]
#[command(version)]
struct Args {
    /// Directory holding the sidecars, relative to the current directory
    directory: Option<PathBuf>,

    /// Settings file (TOML or JSON) listing the fields to interpolate
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Compute and log the interpolated values without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xmp_interp=info,xmp_interp_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command-line arguments
    let args = Args::parse();

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let folder = match args.directory {
        Some(dir) => cwd.join(dir),
        None => cwd,
    };

    info!(
        "Running xmp-interp v{} on \"{}\"",
        env!("CARGO_PKG_VERSION"),
        folder.display()
    );

    let (settings, source) = SettingsResolver::new(&folder)
        .with_cli_path(args.settings)
        .resolve()
        .context("Failed to load settings")?;
    info!("Settings from {}: {}", source, settings.fields.join(", "));

    let driver = RampDriver::new(&folder, settings).context("Invalid settings")?;
    let outcome = driver
        .run(RunOptions {
            dry_run: args.dry_run,
        })
        .with_context(|| format!("Interpolation failed in \"{}\"", folder.display()))?;

    match outcome {
        RunOutcome::NotEnoughFiles { .. } | RunOutcome::NothingToInterpolate { .. } => {
            info!("No files changed");
        }
        RunOutcome::Completed(summary) if summary.dry_run => {
            info!("Dry run complete, {} files staged", summary.files_processed);
        }
        RunOutcome::Completed(summary) => {
            info!(
                "Done: {} files written, {} new backups in {}",
                summary.files_written,
                summary.backups_written,
                driver.backup_store().dir().display()
            );
        }
    }

    Ok(())
}
