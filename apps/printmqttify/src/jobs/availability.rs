//! Printer availability: probes the spooler on a timer and republishes the status.
//!
//! `lpstat -p` output containing "idle" means online; anything else, including a
//! failure to run the probe, means offline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterStatus {
    Online,
    Offline,
}

impl PrinterStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PrinterStatus::Online => "online",
            PrinterStatus::Offline => "offline",
        }
    }
}

/// Receives each probe result. The bus publisher implements this.
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn publish(&self, status: PrinterStatus);
}

/// Sink that only logs the status.
pub struct LogStatusSink;

#[async_trait]
impl StatusSink for LogStatusSink {
    async fn publish(&self, status: PrinterStatus) {
        info!(status = status.as_str(), "Publishing printer status");
    }
}

pub fn status_from_lpstat(stdout: &str) -> PrinterStatus {
    if stdout.contains("idle") {
        PrinterStatus::Online
    } else {
        PrinterStatus::Offline
    }
}

/// Runs `<command> -p` once and maps its output to a status.
pub async fn probe_printer(command: &str) -> PrinterStatus {
    match Command::new(command).arg("-p").output().await {
        Ok(output) => status_from_lpstat(&String::from_utf8_lossy(&output.stdout)),
        Err(e) => {
            warn!(command, error = %e, "Error checking printer status");
            PrinterStatus::Offline
        }
    }
}

/// Probes every `interval` (first probe immediately) and forwards to `sink` until aborted.
pub fn spawn_availability_poller(
    command: String,
    interval: Duration,
    sink: Arc<dyn StatusSink>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let status = probe_printer(&command).await;
            sink.publish(status).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<PrinterStatus>>);

    #[async_trait]
    impl StatusSink for RecordingSink {
        async fn publish(&self, status: PrinterStatus) {
            self.0.lock().unwrap().push(status);
        }
    }

    #[test]
    fn test_idle_printer_is_online() {
        let out = "printer TM-T20 is idle.  enabled since Mon 02 Mar 2026 09:00:00 AM\n";
        assert_eq!(status_from_lpstat(out), PrinterStatus::Online);
    }

    #[test]
    fn test_disabled_printer_is_offline() {
        let out = "printer TM-T20 disabled since Mon 02 Mar 2026 09:00:00 AM -\n\tPaused\n";
        assert_eq!(status_from_lpstat(out), PrinterStatus::Offline);
        assert_eq!(status_from_lpstat(""), PrinterStatus::Offline);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PrinterStatus::Online).unwrap(), "\"online\"");
        assert_eq!(PrinterStatus::Offline.as_str(), "offline");
    }

    #[tokio::test]
    async fn test_probe_failure_is_offline() {
        assert_eq!(
            probe_printer("printmqttify-no-such-lpstat").await,
            PrinterStatus::Offline
        );
    }

    #[tokio::test]
    async fn test_poller_publishes_repeatedly() {
        let sink = Arc::new(RecordingSink::default());
        let handle = spawn_availability_poller(
            "printmqttify-no-such-lpstat".to_string(),
            Duration::from_millis(10),
            sink.clone(),
        );

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while sink.0.lock().unwrap().len() < 2 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        handle.abort();

        let published = sink.0.lock().unwrap().clone();
        assert!(published.len() >= 2, "got {published:?}");
        assert!(published.iter().all(|s| *s == PrinterStatus::Offline));
    }
}
