use thiserror::Error;

/// Failure kinds surfaced by the receipt pipeline and its collaborators.
///
/// Classification and wrapping never fail. Layout fails only on a degenerate
/// configuration. Rendering and artifact persistence fail as `Render`.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Malformed or missing request fields, rejected before the pipeline runs.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Geometry or font constants that cannot produce a page. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// PDF assembly, or creating, writing or persisting the artifact file.
    #[error("Render error: {0}")]
    Render(String),

    /// Job input stream or post-print cleanup.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The print spooler rejected or failed the job.
    #[error("Dispatch error: {0}")]
    Dispatch(String),
}

impl ReceiptError {
    /// Stable short code for structured log fields.
    pub fn code(&self) -> &'static str {
        match self {
            ReceiptError::Validation(_) => "VALIDATION_ERROR",
            ReceiptError::Configuration(_) => "CONFIGURATION_ERROR",
            ReceiptError::Render(_) => "RENDER_ERROR",
            ReceiptError::Io(_) => "IO_ERROR",
            ReceiptError::Dispatch(_) => "DISPATCH_ERROR",
        }
    }

    /// True for failures tied to one request; false for ones that will repeat on every call.
    pub fn is_request_specific(&self) -> bool {
        !matches!(self, ReceiptError::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let err: ReceiptError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert_eq!(err.code(), "IO_ERROR");
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_configuration_is_not_request_specific() {
        assert!(!ReceiptError::Configuration("width".into()).is_request_specific());
        assert!(ReceiptError::Validation("message".into()).is_request_specific());
    }
}
