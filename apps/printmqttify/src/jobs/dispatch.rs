//! Print dispatch: hands a rendered receipt to the OS print spooler.
//!
//! `LpDispatcher` is the default backend: `lp -d <printer> <file>`.
//! Carried by the job loop as `Arc<dyn PrintDispatcher>`.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use crate::errors::ReceiptError;

#[async_trait]
pub trait PrintDispatcher: Send + Sync {
    async fn dispatch(&self, printer_name: &str, path: &Path) -> Result<(), ReceiptError>;
}

/// CUPS `lp` backend.
#[derive(Debug, Clone)]
pub struct LpDispatcher {
    command: String,
}

impl LpDispatcher {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for LpDispatcher {
    fn default() -> Self {
        Self::new("lp")
    }
}

#[async_trait]
impl PrintDispatcher for LpDispatcher {
    async fn dispatch(&self, printer_name: &str, path: &Path) -> Result<(), ReceiptError> {
        let output = Command::new(&self.command)
            .arg("-d")
            .arg(printer_name)
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                ReceiptError::Dispatch(format!("failed to run '{}': {e}", self.command))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(printer = printer_name, status = %output.status, %stderr, "Failed to print");
            return Err(ReceiptError::Dispatch(format!(
                "'{}' exited with {}: {stderr}",
                self.command, output.status
            )));
        }

        info!(
            printer = printer_name,
            path = %path.display(),
            stdout = %String::from_utf8_lossy(&output.stdout).trim(),
            "Printed successfully"
        );
        Ok(())
    }
}
