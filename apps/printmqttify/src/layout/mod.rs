// Receipt layout: glyph metrics, marker classification, word-wrap, page geometry.
// Everything here is synchronous and pure; callers on an async runtime should
// run it inside tokio::task::spawn_blocking.

pub mod engine;
pub mod font_metrics;
pub mod markers;
pub mod wrap;

pub use engine::{Drawable, LayoutConfig, LayoutEngine, MarkerKind, PageLayout, Placement};
pub use font_metrics::{get_metrics, FontRole};
