//! SPECT setup runner - Main Entry Point
//!
//! Builds the detector systems described by a setup file (TOML or JSON),
//! applies their ARF stages and prints a summary. An invalid stage name
//! aborts with a non-zero exit status.
//!
//! Usage: `spect-setup [SETUP_FILE]`

use anyhow::Context;
use std::process::ExitCode;
use spect_system::{config::LoggingConfig, Setup, SetupConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_or_default()));

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file {:?} has no file name", path))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}

fn main() -> anyhow::Result<ExitCode> {
    let config = match std::env::args().nth(1) {
        Some(path) => SetupConfig::load(&path)
            .with_context(|| format!("Failed to load setup file {}", path))?,
        None => SetupConfig::sample(),
    };

    let _guard = init_logging(&config.logging)?;
    tracing::info!("Building {} SPECT system(s)", config.systems.len());

    let setup = match Setup::build(&config) {
        Ok(setup) => setup,
        Err(e) if e.is_configuration() => {
            tracing::error!("Fatal configuration error: {}", e);
            return Ok(ExitCode::from(2));
        }
        Err(e) => return Err(e).context("Setup failed"),
    };

    for line in setup.summary() {
        println!("{}", line);
    }

    tracing::info!("Shutting down...");
    Ok(ExitCode::SUCCESS)
}
