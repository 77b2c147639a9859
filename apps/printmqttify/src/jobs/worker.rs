//! Job handling: validate, render off the async executor, then dispatch.
//!
//! Rendering is CPU-bound, so it runs inside `tokio::task::spawn_blocking`.
//! The generator is shared as an `Arc` so the blocking closure can own it.
//! With `keep_artifacts` off, the artifact is removed after the dispatch
//! attempt whether or not it succeeded.

use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, info, warn};

use crate::errors::ReceiptError;
use crate::generation::ReceiptGenerator;
use crate::jobs::dispatch::PrintDispatcher;
use crate::jobs::request::PrintRequest;
use crate::render::Artifact;

/// What the job loop does with a rendered receipt.
#[derive(Debug, Clone, Copy)]
pub struct JobOptions {
    pub print_enabled: bool,
    pub keep_artifacts: bool,
}

/// Outcome of one successfully handled job.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub printer_name: String,
    pub artifact: Artifact,
    pub printed: bool,
    /// False when the artifact was deleted after printing.
    pub artifact_kept: bool,
}

/// Handles one raw JSON payload end to end.
pub async fn process_payload(
    payload: &[u8],
    generator: &Arc<ReceiptGenerator>,
    dispatcher: &dyn PrintDispatcher,
    options: JobOptions,
) -> Result<JobOutcome, ReceiptError> {
    let request = PrintRequest::parse(payload)?;
    process_request(request, generator, dispatcher, options).await
}

/// Renders a validated request and hands it to the dispatcher when printing is enabled.
pub async fn process_request(
    request: PrintRequest,
    generator: &Arc<ReceiptGenerator>,
    dispatcher: &dyn PrintDispatcher,
    options: JobOptions,
) -> Result<JobOutcome, ReceiptError> {
    info!(printer = %request.printer_name, title = %request.title, "Received print job");

    let gen = Arc::clone(generator);
    let title = request.title.clone();
    let message = request.message.clone();
    let artifact = tokio::task::spawn_blocking(move || gen.generate(&title, &message))
        .await
        .map_err(|e| ReceiptError::Render(format!("generation task failed: {e}")))??;

    if !options.print_enabled {
        info!(path = %artifact.path.display(), "Printing disabled, receipt kept on disk");
        return Ok(JobOutcome {
            printer_name: request.printer_name,
            artifact,
            printed: false,
            artifact_kept: true,
        });
    }

    if let Err(e) = dispatcher.dispatch(&request.printer_name, &artifact.path).await {
        if !options.keep_artifacts {
            discard_quietly(&artifact);
        }
        return Err(e);
    }

    let artifact_kept = options.keep_artifacts || !discard_quietly(&artifact);

    Ok(JobOutcome {
        printer_name: request.printer_name,
        artifact,
        printed: true,
        artifact_kept,
    })
}

/// Removes an artifact the operator does not want kept. Returns false when the
/// file could not be removed.
fn discard_quietly(artifact: &Artifact) -> bool {
    match artifact.clone().discard() {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, path = %artifact.path.display(), "Could not remove receipt");
            false
        }
    }
}

/// Counts of jobs handled by [`run_job_loop`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JobLoopSummary {
    pub completed: usize,
    pub failed: usize,
}

/// Reads newline-delimited JSON requests until end of input and handles each.
///
/// Lines are read as raw bytes, so a request that is not valid UTF-8 fails
/// validation on its own and the loop moves on. Only a failure of the reader
/// itself, or an error that would repeat for every request, ends the loop.
pub async fn run_job_loop<R>(
    mut reader: R,
    generator: &Arc<ReceiptGenerator>,
    dispatcher: &dyn PrintDispatcher,
    options: JobOptions,
) -> Result<JobLoopSummary, ReceiptError>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = JobLoopSummary::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }

        match process_payload(line, generator, dispatcher, options).await {
            Ok(outcome) => {
                summary.completed += 1;
                info!(
                    printer = %outcome.printer_name,
                    path = %outcome.artifact.path.display(),
                    printed = outcome.printed,
                    kept = outcome.artifact_kept,
                    "Print job complete"
                );
            }
            Err(e) if e.is_request_specific() => {
                summary.failed += 1;
                warn!(code = e.code(), error = %e, "Print job failed");
            }
            Err(e) => {
                error!(code = e.code(), error = %e, "Print job failed, stopping");
                return Err(e);
            }
        }
    }

    Ok(summary)
}
