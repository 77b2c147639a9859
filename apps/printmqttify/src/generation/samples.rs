//! Sample receipts covering the checkbox, long-paragraph and mixed-marker layouts.

use tracing::info;

use crate::errors::ReceiptError;
use crate::generation::generator::ReceiptGenerator;
use crate::render::Artifact;

/// `(title, message)` pairs rendered by the `samples` binary.
pub const SAMPLE_RECEIPTS: [(&str, &str); 3] = [
    (
        "Shopping List",
        "- [ ] Apples\n- [ ] Bread\n- [ ] Milk\n- [ ] Butter",
    ),
    (
        "Long Line Test",
        "This is a very long line intended to wrap across multiple visual lines to \
         test indentation and avoid clipping: HDMI extender on smart plug - to control heat?",
    ),
    (
        "Mixed Items",
        "- Item one with wrapping that should indent properly when it wraps to another line\n\
         Normal paragraph line\n\
         - [ ] Another checkbox item that might wrap to see proper indentation\n\
         - [ ] Final item",
    ),
];

/// Renders every sample in order. Stops at the first failure.
pub fn generate_samples(generator: &ReceiptGenerator) -> Result<Vec<Artifact>, ReceiptError> {
    SAMPLE_RECEIPTS
        .iter()
        .enumerate()
        .map(|(i, (title, message))| {
            info!(sample = i + 1, title, "Generating sample receipt");
            generator.generate(title, message)
        })
        .collect()
}
