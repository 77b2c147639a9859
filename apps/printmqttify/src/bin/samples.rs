//! Renders the sample receipts into `OUTPUT_DIR`. Pass `--open` to open each
//! one in the desktop PDF viewer.

use std::process::Command;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use printmqttify::config::Config;
use printmqttify::generation::generate_samples;
use printmqttify::layout::{LayoutConfig, LayoutEngine};
use printmqttify::ReceiptGenerator;

const OPEN_COMMAND: &str = if cfg!(target_os = "macos") {
    "open"
} else {
    "xdg-open"
};

fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let open_files = std::env::args().skip(1).any(|arg| arg == "--open");

    let engine = LayoutEngine::new(LayoutConfig::default()).context("invalid receipt geometry")?;
    let generator = ReceiptGenerator::new(engine, config.output_dir);
    let artifacts = generate_samples(&generator).context("sample generation failed")?;

    for artifact in &artifacts {
        println!("{}", artifact.path.display());
        if open_files {
            match Command::new(OPEN_COMMAND).arg(&artifact.path).status() {
                Ok(status) if status.success() => {}
                Ok(status) => warn!(%status, path = %artifact.path.display(), "Viewer exited with an error"),
                Err(e) => warn!(error = %e, command = OPEN_COMMAND, "Failed to open PDF"),
            }
        }
    }

    info!(count = artifacts.len(), "Sample receipts generated");
    Ok(())
}
