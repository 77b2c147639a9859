//! PrintMQTTify: renders short titled messages into single-page PDFs sized for
//! 80mm thermal receipt printers.
//!
//! The core pipeline (`layout`, `render`, `generation`) is synchronous and pure
//! per request. `jobs` holds the thin async shells that feed it requests and hand
//! its output to the print spooler.

pub mod config;
pub mod errors;
pub mod generation;
pub mod jobs;
pub mod layout;
pub mod render;

pub use errors::ReceiptError;
pub use generation::{generate_receipt, ReceiptGenerator};
pub use render::Artifact;
