use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use printmqttify::config::Config;
use printmqttify::jobs::{
    run_job_loop, spawn_availability_poller, JobOptions, LogStatusSink, LpDispatcher,
    PrintDispatcher,
};
use printmqttify::layout::{LayoutConfig, LayoutEngine};
use printmqttify::ReceiptGenerator;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PrintMQTTify v{}", env!("CARGO_PKG_VERSION"));

    // Geometry problems are fatal here rather than per request.
    let layout_config = LayoutConfig::default();
    let engine = LayoutEngine::new(layout_config).context("invalid receipt geometry")?;
    info!(
        page_width = engine.config().page_width,
        content_width = engine.config().content_width(),
        "Receipt layout ready"
    );

    let generator = Arc::new(ReceiptGenerator::new(engine, config.output_dir.clone()));
    let dispatcher: Arc<dyn PrintDispatcher> = Arc::new(LpDispatcher::new(config.lp_command.clone()));
    let options = JobOptions {
        print_enabled: config.print_enabled,
        keep_artifacts: config.keep_artifacts,
    };

    let poller = config.print_enabled.then(|| {
        spawn_availability_poller(
            config.lpstat_command.clone(),
            Duration::from_secs(config.availability_interval_secs.max(1)),
            Arc::new(LogStatusSink),
        )
    });

    // One JSON request per line on stdin.
    info!(output_dir = %generator.output_dir().display(), "Waiting for print jobs on stdin");
    let summary = run_job_loop(
        BufReader::new(tokio::io::stdin()),
        &generator,
        dispatcher.as_ref(),
        options,
    )
    .await
    .context("job loop stopped")?;

    if let Some(handle) = poller {
        handle.abort();
    }
    info!(
        completed = summary.completed,
        failed = summary.failed,
        "Input closed, shutting down"
    );
    Ok(())
}
