// Page serialization: PDF assembly and artifact persistence.

pub mod artifact;
pub mod pdf;

pub use artifact::{write_artifact, Artifact};
pub use pdf::render_pdf;
