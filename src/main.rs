mod config;
mod executor;
mod helpers;
mod pipeline;
mod platform;
mod registry;
mod shortcut;
mod steam;
#[cfg(test)]
mod testing;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::Settings;
use helpers::prompt::confirm_on_terminal;
use helpers::transport::HttpTransport;
use pipeline::{Pipeline, RunOutcome};
use platform::ShortcutPlatform;
use steam::SteamCmdLookup;

const EXIT_MISSING_PATH: u8 = 1;
const EXIT_NOT_A_DIRECTORY: u8 = 2;
const EXIT_INVALID_CONFIG: u8 = 3;
const EXIT_RUN_FAILED: u8 = 4;
const EXIT_UNSUPPORTED_PLATFORM: u8 = 100;

#[derive(Parser, Debug)]
#[command(name = "steam-icon-fixer", version)]
#[command(about = "Redownload missing icons for Steam game shortcuts")]
struct Args {
    /// Directory containing the shortcuts to repair
    search_path: Option<PathBuf>,

    /// Where repaired icons are written (desktop entries only, defaults to $HOME/.icons)
    icon_path: Option<PathBuf>,

    /// Do not ask for confirmation before downloading
    #[arg(short, long)]
    yes: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Settings file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

async fn repair_shortcuts(
    platform: &dyn ShortcutPlatform,
    settings: &Settings,
    search_path: &Path,
    icon_path: Option<&Path>,
    assume_yes: bool,
) -> Result<()> {
    let transport = Arc::new(HttpTransport::new(settings).context("build HTTP client")?);
    let lookup = SteamCmdLookup::new(transport.clone(), settings.lookup_url());
    let pipeline = Pipeline::new(platform, &lookup, transport.as_ref(), settings);

    let outcome = pipeline
        .run(search_path, icon_path, |_pending| {
            if assume_yes {
                Ok(true)
            } else {
                confirm_on_terminal("Do you want to redownload the icons?")
            }
        })
        .await?;

    if let RunOutcome::Completed(report) = outcome {
        info!(
            "{} of {} icons repaired.",
            report.repaired().len(),
            report.repaired().len() + report.error_count()
        );
        if !report.failures().is_empty() {
            let failed: Vec<&str> = report.failures().iter().map(|(id, _)| id.as_str()).collect();
            warn!("Games still missing an icon: {}", failed.join(", "));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    println!("Steam Icon Fixer, Version {}\n", env!("CARGO_PKG_VERSION"));

    let Some(platform) = platform::detect() else {
        error!(
            "This program is not compatible with your operating system. You may only run this program on a Windows or Linux system."
        );
        return ExitCode::from(EXIT_UNSUPPORTED_PLATFORM);
    };

    let Some(search_path) = args.search_path.as_deref() else {
        println!("{}", platform.usage());
        return ExitCode::SUCCESS;
    };

    if !search_path.exists() {
        warn!("{} does not exist.", search_path.display());
        return ExitCode::from(EXIT_MISSING_PATH);
    }

    if !search_path.is_dir() {
        warn!("{} is a file.", search_path.display());
        return ExitCode::from(EXIT_NOT_A_DIRECTORY);
    }

    let settings = match config::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            error!("Invalid configuration: {err}");
            return ExitCode::from(EXIT_INVALID_CONFIG);
        }
    };

    match repair_shortcuts(platform.as_ref(), &settings, search_path, args.icon_path.as_deref(), args.yes).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(EXIT_RUN_FAILED)
        }
    }
}
