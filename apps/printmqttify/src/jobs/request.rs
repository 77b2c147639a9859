//! Inbound print requests: the JSON shape the bus subscriber hands over.
//!
//! `{ "printer_name": "...", "title": "...", "message": "..." }`
//! `title` is optional and defaults to the current local timestamp.

use serde::{Deserialize, Serialize};

use crate::errors::ReceiptError;
use crate::generation::local_timestamp;

#[derive(Debug, Deserialize)]
struct RawPrintRequest {
    printer_name: Option<String>,
    title: Option<String>,
    message: Option<String>,
}

/// A validated request, ready for the core entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintRequest {
    pub printer_name: String,
    pub title: String,
    pub message: String,
}

impl PrintRequest {
    /// Parses and validates a JSON payload; a missing title becomes the local timestamp.
    pub fn parse(payload: &[u8]) -> Result<Self, ReceiptError> {
        Self::parse_with_default_title(payload, local_timestamp)
    }

    pub fn parse_with_default_title(
        payload: &[u8],
        default_title: impl FnOnce() -> String,
    ) -> Result<Self, ReceiptError> {
        let raw: RawPrintRequest = serde_json::from_slice(payload)
            .map_err(|e| ReceiptError::Validation(format!("invalid JSON payload: {e}")))?;

        let printer_name = match raw.printer_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                return Err(ReceiptError::Validation(
                    "missing 'printer_name' in payload".to_string(),
                ))
            }
        };
        let message = raw.message.ok_or_else(|| {
            ReceiptError::Validation("missing 'message' in payload".to_string())
        })?;
        let title = raw.title.unwrap_or_else(default_title);

        Ok(Self {
            printer_name,
            title,
            message,
        })
    }
}
