//! packager-fetch CLI entry point
//!
//! Exits 0 when the bundle is in place, 1 on any fatal failure.

use clap::Parser;
use console::style;
use packager_fetch::cli::{Cli, LogFormat};
use packager_fetch::config::{ConfigManager, Settings};
use packager_fetch::error::{FetchError, FetchResult};
use packager_fetch::orchestrator::{Orchestrator, Outcome};
use packager_fetch::ui::UiContext;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> FetchResult<()> {
    let cli = Cli::parse();

    let cwd =
        std::env::current_dir().map_err(|e| FetchError::io("getting current directory", e))?;
    let root = cwd.join(&cli.root);

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(cwd.join(path)),
        None => ConfigManager::discover(&root),
    };
    let config = config_manager.load().await?;

    let format = cli
        .log_format
        .unwrap_or_else(|| LogFormat::from_config(&config.general.log_format));
    init_logging(&cli, format);
    if config_manager.exists() {
        debug!("Loaded config from {}", config_manager.path().display());
    } else {
        debug!("No config at {}, using defaults", config_manager.path().display());
    }

    let settings = Settings::resolve(&root, &cwd, config, &cli.overrides());
    debug!("Resolved settings: {:?}", settings);

    let orchestrator = Orchestrator::from_settings(settings, UiContext::detect()).await?;
    match orchestrator.run().await? {
        Outcome::LocalBuild { source } => debug!("Bundle copied from {}", source.display()),
        Outcome::AlreadyCurrent => debug!("Bundle already current"),
        Outcome::Downloaded { bytes } => debug!("Bundle downloaded ({} bytes)", bytes),
    }
    Ok(())
}

/// RUST_LOG wins over the verbosity flags
fn init_logging(cli: &Cli, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.without_time().init(),
        LogFormat::Json => builder.json().init(),
    }
}
