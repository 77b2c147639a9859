//! Greedy word-wrap of classified lines against a width budget.
//!
//! Words are split on single spaces and accumulated while `current + " " + word`
//! still fits. A word that alone exceeds the budget is kept whole on its own
//! line and may overflow; lines are never broken mid-word.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::FontMetricTable;
use crate::layout::markers::{ClassifiedLine, LineVariant};

/// Glyph drawn in front of dash items.
pub const DASH_GLYPH: &str = "\u{2022}";
/// Checkbox side length as a fraction of the body font size.
pub const CHECKBOX_SIZE_RATIO: f32 = 0.7;
/// Space between a marker and the item text, in points.
pub const MARKER_GAP: f32 = 4.0;

/// One wrapped, individually rendered line of body text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualLine {
    pub text: String,
    /// Horizontal offset of the text from the left margin.
    pub indent: f32,
    /// Only the first chunk of a marked line draws the marker.
    pub is_first_of_group: bool,
    pub variant: LineVariant,
    /// Index of the logical line this chunk belongs to.
    pub group: usize,
}

/// Width a marker occupies at the left margin, excluding the gap.
pub fn marker_width(variant: LineVariant, metrics: &FontMetricTable, size: f32) -> f32 {
    match variant {
        LineVariant::Plain => 0.0,
        LineVariant::Dash => metrics.measure_str(DASH_GLYPH, size),
        LineVariant::Checkbox { .. } => size * CHECKBOX_SIZE_RATIO,
    }
}

/// Indent reserved in front of the text of a marked line.
pub fn marker_indent(variant: LineVariant, metrics: &FontMetricTable, size: f32) -> f32 {
    if variant.is_marked() {
        marker_width(variant, metrics, size) + MARKER_GAP
    } else {
        0.0
    }
}

/// Greedy word-wrap. Returns the chunks in order; empty text yields one empty chunk.
pub fn wrap_text(text: &str, budget: f32, metrics: &FontMetricTable, size: f32) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut words = text.split(' ');
    let mut lines = Vec::new();
    // split always yields at least one item
    let mut current = words.next().unwrap_or_default().to_string();

    for word in words {
        let candidate = format!("{current} {word}");
        if metrics.measure_str(&candidate, size) <= budget {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);
    lines
}

/// Expands one classified line into visual lines, reserving the marker indent.
pub fn wrap_line(
    line: &ClassifiedLine,
    content_width: f32,
    metrics: &FontMetricTable,
    size: f32,
    group: usize,
) -> Vec<VisualLine> {
    metrics.report_fallbacks(&line.content);
    let indent = marker_indent(line.variant, metrics, size);
    let budget = content_width - indent;

    wrap_text(&line.content, budget, metrics, size)
        .into_iter()
        .enumerate()
        .map(|(i, text)| VisualLine {
            text,
            indent,
            is_first_of_group: i == 0,
            variant: line.variant,
            group,
        })
        .collect()
}

/// Wraps every classified line, preserving logical-line order.
pub fn wrap_lines(
    lines: &[ClassifiedLine],
    content_width: f32,
    metrics: &FontMetricTable,
    size: f32,
) -> Vec<VisualLine> {
    lines
        .iter()
        .enumerate()
        .flat_map(|(group, line)| wrap_line(line, content_width, metrics, size, group))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
