//! Artifact persistence: writes rendered bytes under a collision-free name.
//!
//! Bytes go to an anonymous `tempfile` in the target directory first and are
//! renamed to `receipt-<uuid>.pdf` only once fully written. A failure at any
//! step drops the temp file, which deletes it, so no partial artifact survives.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::ReceiptError;

/// A rendered receipt on disk. Owned by the caller once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub bytes_written: usize,
}

impl Artifact {
    /// Deletes the file. Used after a successful print when artifacts are not kept.
    pub fn discard(self) -> Result<(), ReceiptError> {
        std::fs::remove_file(&self.path)?;
        Ok(())
    }
}

/// Writes `bytes` into `dir` as `receipt-<uuid v4>.pdf`.
///
/// Every filesystem failure (missing directory, permissions, disk full) is a
/// `ReceiptError::Render`.
pub fn write_artifact(bytes: &[u8], dir: &Path) -> Result<Artifact, ReceiptError> {
    let mut tmp = tempfile::Builder::new()
        .prefix(".receipt-")
        .suffix(".pdf.part")
        .tempfile_in(dir)
        .map_err(|e| render_io("create temp file in", dir, e))?;

    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| render_io("write receipt in", dir, e))?;

    let path = dir.join(format!("receipt-{}.pdf", Uuid::new_v4()));
    if let Err(e) = tmp.persist_noclobber(&path) {
        warn!(path = %path.display(), "Failed to persist receipt, partial file removed");
        return Err(ReceiptError::Render(format!(
            "failed to persist {}: {}",
            path.display(),
            e.error
        )));
    }

    info!(path = %path.display(), bytes = bytes.len(), "PDF saved");
    Ok(Artifact {
        path,
        bytes_written: bytes.len(),
    })
}

fn render_io(step: &str, dir: &Path, e: std::io::Error) -> ReceiptError {
    warn!(dir = %dir.display(), error = %e, "Failed to {step} output directory");
    ReceiptError::Render(format!("failed to {step} {}: {e}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_artifact_creates_named_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = write_artifact(b"%PDF-1.7 test", dir.path()).unwrap();

        assert_eq!(artifact.bytes_written, 13);
        assert_eq!(std::fs::read(&artifact.path).unwrap(), b"%PDF-1.7 test");
        let name = artifact.path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("receipt-") && name.ends_with(".pdf"), "{name}");
    }

    #[test]
    fn test_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_artifact(b"a", dir.path()).unwrap();
        let b = write_artifact(b"b", dir.path()).unwrap();
        assert_ne!(a.path, b.path);
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(b"data", dir.path()).unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_missing_directory_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = write_artifact(b"data", &missing).unwrap_err();
        assert!(matches!(err, ReceiptError::Render(_)), "{err:?}");
        assert!(err.to_string().contains("does-not-exist"), "{err}");
    }

    #[test]
    fn test_discard_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = write_artifact(b"data", dir.path()).unwrap();
        let path = artifact.path.clone();
        artifact.discard().unwrap();
        assert!(!path.exists());
    }
}
