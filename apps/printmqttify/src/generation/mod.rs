// Core entry point: classify → wrap → layout → serialize → persist.

pub mod generator;
pub mod samples;

pub use generator::{
    footer_text, format_timestamp, generate_receipt, local_timestamp, ReceiptGenerator,
    PRODUCT_NAME,
};
pub use samples::{generate_samples, SAMPLE_RECEIPTS};
