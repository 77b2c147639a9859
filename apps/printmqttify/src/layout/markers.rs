//! Marker classification: tags each logical line as plain text, a dash item,
//! or a checkbox item, and strips the marker syntax from the content.
//!
//! Rules, checked in order:
//! 1. optional `- `, then `[ ]` / `[x]` / `[X]` / `[]`, then whitespace → Checkbox
//! 2. leading `- ` → Dash
//! 3. anything else (including the empty line) → Plain

use serde::{Deserialize, Serialize};

/// Marker style of a logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineVariant {
    Plain,
    Dash,
    /// `checked` is set for `[x]` and `[X]`.
    Checkbox { checked: bool },
}

impl LineVariant {
    pub fn is_marked(self) -> bool {
        !matches!(self, LineVariant::Plain)
    }
}

/// A logical line with its marker syntax split off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    pub variant: LineVariant,
    pub content: String,
}

const DASH_PREFIX: &str = "- ";

/// Classifies one logical line. Never fails.
pub fn classify(line: &str) -> ClassifiedLine {
    if let Some((checked, content)) = parse_checkbox(line) {
        return ClassifiedLine {
            variant: LineVariant::Checkbox { checked },
            content: content.to_string(),
        };
    }

    if let Some(rest) = line.strip_prefix(DASH_PREFIX) {
        return ClassifiedLine {
            variant: LineVariant::Dash,
            content: rest.to_string(),
        };
    }

    ClassifiedLine {
        variant: LineVariant::Plain,
        content: line.to_string(),
    }
}

/// Splits a message on line breaks and classifies every logical line, in order.
///
/// A trailing `\r` is dropped so CRLF input lays out the same as LF input.
pub fn classify_message(message: &str) -> Vec<ClassifiedLine> {
    message
        .split('\n')
        .map(|line| classify(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

/// Matches `(- )?\[( |x|X)?\]\s+(.*)` and returns `(checked, content)`.
fn parse_checkbox(line: &str) -> Option<(bool, &str)> {
    let rest = line.strip_prefix(DASH_PREFIX).unwrap_or(line);
    let rest = rest.strip_prefix('[')?;

    let (checked, rest) = match rest.chars().next()? {
        ']' => (false, rest),
        ' ' => (false, &rest[1..]),
        'x' | 'X' => (true, &rest[1..]),
        _ => return None,
    };
    let rest = rest.strip_prefix(']')?;

    let content = rest.trim_start();
    if content.len() == rest.len() {
        // No whitespace after the token: `[x]foo` is plain text.
        return None;
    }
    Some((checked, content))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
