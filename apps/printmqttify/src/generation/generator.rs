//! Receipt Generation: the core entry point.
//!
//! Flow: classify → wrap → layout → serialize → persist.
//!
//! Straight-line and synchronous. The only input that differs between two calls
//! with the same title and message is the footer timestamp.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::errors::ReceiptError;
use crate::layout::engine::{LayoutConfig, LayoutEngine, PageLayout};
use crate::render::{render_pdf, write_artifact, Artifact};

/// Name printed in the footer attribution.
pub const PRODUCT_NAME: &str = "PrintMQTTify";

/// `MM/DD/YYYY hh:mm AM/PM`.
const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M %p";

/// Formats a local wall-clock time the way footers and default titles show it.
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time, formatted.
pub fn local_timestamp() -> String {
    format_timestamp(&Local::now().naive_local())
}

/// `Generated by <product> — <timestamp>`.
pub fn footer_text(at: &NaiveDateTime) -> String {
    format!("Generated by {PRODUCT_NAME} \u{2014} {}", format_timestamp(at))
}

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

/// Owns a validated layout engine and the directory artifacts are written to.
#[derive(Debug, Clone)]
pub struct ReceiptGenerator {
    engine: LayoutEngine,
    output_dir: PathBuf,
}

impl ReceiptGenerator {
    pub fn new(engine: LayoutEngine, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            output_dir: output_dir.into(),
        }
    }

    /// Default 80mm geometry, writing to the system temp directory.
    pub fn with_defaults() -> Result<Self, ReceiptError> {
        let engine = LayoutEngine::new(LayoutConfig::default())?;
        Ok(Self::new(engine, std::env::temp_dir()))
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Computes the page layout with a footer stamped at `at`.
    pub fn layout_at(&self, title: &str, message: &str, at: &NaiveDateTime) -> PageLayout {
        self.engine.layout(title, message, &footer_text(at))
    }

    /// Renders PDF bytes without touching disk.
    pub fn render_bytes_at(
        &self,
        title: &str,
        message: &str,
        at: &NaiveDateTime,
    ) -> Result<Vec<u8>, ReceiptError> {
        let layout = self.layout_at(title, message, at);
        render_pdf(&layout)
    }

    /// Renders and persists a receipt stamped at `at`.
    pub fn generate_at(
        &self,
        title: &str,
        message: &str,
        at: &NaiveDateTime,
    ) -> Result<Artifact, ReceiptError> {
        let layout = self.layout_at(title, message, at);
        let bytes = render_pdf(&layout).inspect_err(|e| {
            warn!(error = %e, title, "PDF generation failed");
        })?;
        let artifact = write_artifact(&bytes, &self.output_dir)?;

        info!(
            path = %artifact.path.display(),
            page_height = layout.page_height,
            title_size = layout.title_font_size,
            visual_lines = layout.body_lines.len(),
            "Receipt generated"
        );
        Ok(artifact)
    }

    /// Renders and persists a receipt stamped with the current local time.
    pub fn generate(&self, title: &str, message: &str) -> Result<Artifact, ReceiptError> {
        self.generate_at(title, message, &Local::now().naive_local())
    }
}

/// Renders `(title, message)` with default geometry into the system temp directory.
pub fn generate_receipt(title: &str, message: &str) -> Result<Artifact, ReceiptError> {
    ReceiptGenerator::with_defaults()?.generate(title, message)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
