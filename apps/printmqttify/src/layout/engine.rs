//! Layout Engine: turns a title and wrapped body into absolute page geometry.
//!
//! # Geometry
//! - Page width is fixed (80mm thermal roll); page height grows with content.
//! - Coordinates are PDF points with the origin at the bottom-left corner.
//! - Placement runs strictly top-down: title, divider, body lines, footer.
//!
//! The engine is pure: identical inputs give identical layouts. The footer text
//! (which carries the timestamp) is supplied by the caller.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ReceiptError;
use crate::layout::font_metrics::{get_metrics, FontRole};
use crate::layout::markers::{classify_message, LineVariant};
use crate::layout::wrap::{wrap_lines, VisualLine};

/// Points per millimetre.
pub const MM: f32 = 72.0 / 25.4;

/// Divider and spacer slots reserved around the title and footer.
const RESERVED_LINE_SLOTS: usize = 4;

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

/// Receipt geometry. Validate once at startup with [`LayoutConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub side_margin: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    /// Autoscale starts here.
    pub title_max_size: f32,
    /// Autoscale never goes below this; overflow is tolerated at the floor.
    pub title_min_size: f32,
    pub body_size: f32,
    pub footer_size: f32,
    /// Short receipts are padded to this height so the page stays portrait.
    pub min_page_height: f32,
}

impl Default for LayoutConfig {
    /// 80mm roll, 5mm margins, Helvetica 14/10/8pt.
    fn default() -> Self {
        let page_width = 80.0 * MM;
        let margin = 5.0 * MM;
        Self {
            page_width,
            side_margin: margin,
            top_margin: margin,
            bottom_margin: margin,
            title_max_size: 14.0,
            title_min_size: 8.0,
            body_size: 10.0,
            footer_size: 8.0,
            min_page_height: page_width + 1.0,
        }
    }
}

impl LayoutConfig {
    /// Usable width between the side margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.side_margin
    }

    /// Vertical distance between consecutive baselines.
    pub fn line_height(&self) -> f32 {
        (self.body_size + 2.0).max(12.0)
    }

    /// Rejects geometry that cannot produce a page.
    pub fn validate(&self) -> Result<(), ReceiptError> {
        for (name, value) in [
            ("page_width", self.page_width),
            ("side_margin", self.side_margin),
            ("top_margin", self.top_margin),
            ("bottom_margin", self.bottom_margin),
            ("title_max_size", self.title_max_size),
            ("title_min_size", self.title_min_size),
            ("body_size", self.body_size),
            ("footer_size", self.footer_size),
            ("min_page_height", self.min_page_height),
        ] {
            if !value.is_finite() {
                return Err(ReceiptError::Configuration(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        let content_width = self.content_width();
        if !(content_width > 0.0) {
            return Err(ReceiptError::Configuration(format!(
                "content width must be positive (page width {:.2}pt, side margin {:.2}pt)",
                self.page_width, self.side_margin
            )));
        }
        if self.top_margin < 0.0 || self.bottom_margin < 0.0 || self.side_margin < 0.0 {
            return Err(ReceiptError::Configuration(
                "margins must not be negative".to_string(),
            ));
        }
        for (name, size) in [
            ("title_min_size", self.title_min_size),
            ("body_size", self.body_size),
            ("footer_size", self.footer_size),
        ] {
            if !(size > 0.0) {
                return Err(ReceiptError::Configuration(format!(
                    "{name} must be positive, got {size}"
                )));
            }
        }
        if self.title_max_size < self.title_min_size {
            return Err(ReceiptError::Configuration(format!(
                "title_max_size ({}) is below title_min_size ({})",
                self.title_max_size, self.title_min_size
            )));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// Marker shapes drawn at the left margin of list items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MarkerKind {
    Dash,
    Checkbox { checked: bool },
}

/// Something the serializer draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Drawable {
    Text { text: String, role: FontRole, size: f32 },
    /// Horizontal rule from `x` to `x_end` at `y`.
    Divider { x_end: f32 },
    /// `size` is the body font size the marker is scaled to.
    Marker { kind: MarkerKind, size: f32 },
}

/// A drawable anchored at a baseline position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub drawable: Drawable,
    pub x: f32,
    pub y: f32,
}

/// Complete geometry for one receipt page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub title_font_size: f32,
    pub line_height: f32,
    pub body_lines: Vec<VisualLine>,
    /// Draw operations in paint order.
    pub baselines: Vec<Placement>,
}

impl PageLayout {
    /// Text placements drawn in `role`, in order.
    pub fn texts(&self, role: FontRole) -> impl Iterator<Item = (&str, &Placement)> {
        self.baselines.iter().filter_map(move |p| match &p.drawable {
            Drawable::Text { text, role: r, .. } if *r == role => Some((text.as_str(), p)),
            _ => None,
        })
    }

    pub fn markers(&self) -> impl Iterator<Item = (MarkerKind, &Placement)> {
        self.baselines.iter().filter_map(|p| match p.drawable {
            Drawable::Marker { kind, .. } => Some((kind, p)),
            _ => None,
        })
    }

    pub fn dividers(&self) -> impl Iterator<Item = &Placement> {
        self.baselines
            .iter()
            .filter(|p| matches!(p.drawable, Drawable::Divider { .. }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

/// Holds a validated [`LayoutConfig`]; cheap to share across threads.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Result<Self, ReceiptError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Largest whole size in `[title_min_size, title_max_size]` whose width fits
    /// the content width; pinned at the floor when nothing fits.
    pub fn fit_title_size(&self, title: &str) -> f32 {
        let metrics = get_metrics(FontRole::Title);
        let content_width = self.config.content_width();
        let mut size = self.config.title_max_size;

        while metrics.measure_str(title, size) > content_width
            && size > self.config.title_min_size
        {
            size = (size - 1.0).max(self.config.title_min_size);
        }
        size
    }

    /// Page height for a title at `title_size` over `visual_lines` body lines.
    pub fn page_height(&self, title_size: f32, visual_lines: usize) -> f32 {
        let cfg = &self.config;
        let title_ascent = get_metrics(FontRole::Title).ascent_ratio() * title_size;
        let required = cfg.top_margin
            + title_ascent
            + (visual_lines + RESERVED_LINE_SLOTS) as f32 * cfg.line_height()
            + cfg.footer_size
            + cfg.bottom_margin;
        required.max(cfg.min_page_height)
    }

    /// Classifies, wraps and places the receipt content.
    pub fn layout(&self, title: &str, message: &str, footer: &str) -> PageLayout {
        let cfg = &self.config;
        let body_metrics = get_metrics(FontRole::Body);
        let title_metrics = get_metrics(FontRole::Title);
        let content_width = cfg.content_width();
        let line_height = cfg.line_height();
        let margin = cfg.side_margin;

        let classified = classify_message(message);
        let body_lines = wrap_lines(&classified, content_width, body_metrics, cfg.body_size);

        title_metrics.report_fallbacks(title);
        let title_size = self.fit_title_size(title);
        let title_ascent = title_metrics.ascent_ratio() * title_size;
        let page_height = self.page_height(title_size, body_lines.len());

        let mut baselines = Vec::with_capacity(body_lines.len() * 2 + 3);

        // Title, centred; left-aligned at the margin when it overflows.
        let mut y = page_height - cfg.top_margin - title_ascent;
        let title_width = title_metrics.measure_str(title, title_size);
        baselines.push(Placement {
            drawable: Drawable::Text {
                text: title.to_string(),
                role: FontRole::Title,
                size: title_size,
            },
            x: margin + ((content_width - title_width) / 2.0).max(0.0),
            y,
        });

        y -= line_height;
        baselines.push(Placement {
            drawable: Drawable::Divider {
                x_end: cfg.page_width - margin,
            },
            x: margin,
            y,
        });

        y -= line_height;
        let mut last_body_y = y;
        for line in &body_lines {
            if line.is_first_of_group {
                if let Some(kind) = marker_kind(line.variant) {
                    baselines.push(Placement {
                        drawable: Drawable::Marker {
                            kind,
                            size: cfg.body_size,
                        },
                        x: margin,
                        y,
                    });
                }
            }
            if !line.text.is_empty() {
                baselines.push(Placement {
                    drawable: Drawable::Text {
                        text: line.text.clone(),
                        role: FontRole::Body,
                        size: cfg.body_size,
                    },
                    x: margin + line.indent,
                    y,
                });
            }
            last_body_y = y;
            y -= line_height;
        }

        let footer_y = (cfg.bottom_margin + cfg.footer_size).max(last_body_y - line_height);
        baselines.push(Placement {
            drawable: Drawable::Text {
                text: footer.to_string(),
                role: FontRole::Footer,
                size: cfg.footer_size,
            },
            x: margin,
            y: footer_y,
        });

        debug!(
            page_height,
            title_size,
            visual_lines = body_lines.len(),
            logical_lines = classified.len(),
            "Receipt layout computed"
        );

        PageLayout {
            page_width: cfg.page_width,
            page_height,
            title_font_size: title_size,
            line_height,
            body_lines,
            baselines,
        }
    }
}

fn marker_kind(variant: LineVariant) -> Option<MarkerKind> {
    match variant {
        LineVariant::Plain => None,
        LineVariant::Dash => Some(MarkerKind::Dash),
        LineVariant::Checkbox { checked } => Some(MarkerKind::Checkbox { checked }),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const FOOTER: &str = "Generated by PrintMQTTify \u{2014} 01/02/2026 09:30 AM";

    fn engine() -> LayoutEngine {
        LayoutEngine::new(LayoutConfig::default()).expect("default config is valid")
    }

    fn min_height_bound(engine: &LayoutEngine, layout: &PageLayout) -> f32 {
        let cfg = engine.config();
        cfg.top_margin
            + get_metrics(FontRole::Title).ascent_ratio() * layout.title_font_size
            + cfg.line_height()
            + cfg.bottom_margin
    }

    // ── configuration ───────────────────────────────────────────────────────

    #[test]
    fn test_default_config_sanity() {
        let cfg = LayoutConfig::default();
        assert!((cfg.page_width - 226.77).abs() < 0.01);
        assert!((cfg.content_width() - 198.43).abs() < 0.01);
        assert_eq!(cfg.line_height(), 12.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_line_height_tracks_large_body_size() {
        let cfg = LayoutConfig {
            body_size: 14.0,
            ..LayoutConfig::default()
        };
        assert_eq!(cfg.line_height(), 16.0);
    }

    #[test]
    fn test_nonpositive_content_width_is_configuration_error() {
        let cfg = LayoutConfig {
            side_margin: 40.0 * MM,
            ..LayoutConfig::default()
        };
        let err = LayoutEngine::new(cfg).unwrap_err();
        assert!(matches!(err, ReceiptError::Configuration(_)), "{err:?}");
    }

    #[test]
    fn test_zero_font_size_is_configuration_error() {
        let cfg = LayoutConfig {
            body_size: 0.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ReceiptError::Configuration(_))
        ));
    }

    #[test]
    fn test_non_finite_geometry_is_configuration_error() {
        let unbounded_title = LayoutConfig {
            title_max_size: f32::INFINITY,
            ..LayoutConfig::default()
        };
        let nan_margin = LayoutConfig {
            top_margin: f32::NAN,
            ..LayoutConfig::default()
        };
        let nan_title = LayoutConfig {
            title_max_size: f32::NAN,
            ..LayoutConfig::default()
        };
        for cfg in [unbounded_title, nan_margin, nan_title] {
            let err = LayoutEngine::new(cfg).unwrap_err();
            assert!(err.to_string().contains("must be finite"), "{err}");
        }
    }

    // ── title autoscale ─────────────────────────────────────────────────────

    #[test]
    fn test_short_title_keeps_max_size() {
        assert_eq!(engine().fit_title_size("Shopping List"), 14.0);
    }

    #[test]
    fn test_title_size_is_largest_that_fits() {
        let engine = engine();
        let metrics = get_metrics(FontRole::Title);
        let cw = engine.config().content_width();
        let title = "Weekly Grocery Run Plus Hardware";
        let size = engine.fit_title_size(title);

        assert!((8.0..=14.0).contains(&size));
        assert!(size < 14.0, "title should have been shrunk");
        assert!(metrics.measure_str(title, size) <= cw);
        assert!(metrics.measure_str(title, size + 1.0) > cw);
    }

    #[test]
    fn test_overwide_title_pins_at_floor() {
        let title = "An Extremely Long Receipt Title That Cannot Possibly Fit On Eighty Millimetres";
        let layout = engine().layout(title, "body", FOOTER);
        assert_eq!(layout.title_font_size, 8.0);
        let (text, placement) = layout.texts(FontRole::Title).next().unwrap();
        assert_eq!(text, title);
        assert_eq!(placement.x, engine().config().side_margin);
    }

    // ── height ──────────────────────────────────────────────────────────────

    #[test]
    fn test_short_content_uses_floor_height() {
        let layout = engine().layout("Hi", "one line", FOOTER);
        assert_eq!(layout.page_height, LayoutConfig::default().min_page_height);
    }

    #[test]
    fn test_long_content_grows_page() {
        let message = vec!["line"; 40].join("\n");
        let engine = engine();
        let layout = engine.layout("Log", &message, FOOTER);
        let cfg = engine.config();
        let expected = cfg.top_margin
            + 0.718 * 14.0
            + 44.0 * cfg.line_height()
            + cfg.footer_size
            + cfg.bottom_margin;
        assert!((layout.page_height - expected).abs() < 1e-3);
        assert!(layout.page_height >= min_height_bound(&engine, &layout));
    }

    // ── placement ───────────────────────────────────────────────────────────

    #[test]
    fn test_scenario_shopping_list() {
        let engine = engine();
        let layout = engine.layout(
            "Shopping List",
            "- [ ] Apples\n- [ ] Bread\n- [ ] Milk\n- [ ] Butter",
            FOOTER,
        );

        assert_eq!(layout.title_font_size, 14.0);
        assert_eq!(layout.body_lines.len(), 4);
        assert_eq!(layout.dividers().count(), 1);
        assert_eq!(layout.texts(FontRole::Footer).count(), 1);

        let markers: Vec<MarkerKind> = layout.markers().map(|(k, _)| k).collect();
        assert_eq!(markers, vec![MarkerKind::Checkbox { checked: false }; 4]);

        let body: Vec<&str> = layout.texts(FontRole::Body).map(|(t, _)| t).collect();
        assert_eq!(body, vec!["Apples", "Bread", "Milk", "Butter"]);
    }

    #[test]
    fn test_vertical_order_is_top_down() {
        let engine = engine();
        let layout = engine.layout("Title", "a\nb\nc", FOOTER);
        let lh = layout.line_height;
        let title_y = layout.texts(FontRole::Title).next().unwrap().1.y;
        let divider_y = layout.dividers().next().unwrap().y;
        let body_y: Vec<f32> = layout.texts(FontRole::Body).map(|(_, p)| p.y).collect();

        assert!((title_y - divider_y - lh).abs() < 1e-4);
        assert!((divider_y - body_y[0] - lh).abs() < 1e-4);
        assert!((body_y[0] - body_y[1] - lh).abs() < 1e-4);
        assert!((body_y[1] - body_y[2] - lh).abs() < 1e-4);
    }

    #[test]
    fn test_title_is_centred() {
        let engine = engine();
        let layout = engine.layout("Hi", "", FOOTER);
        let cfg = engine.config();
        let (_, placement) = layout.texts(FontRole::Title).next().unwrap();
        let width = get_metrics(FontRole::Title).measure_str("Hi", 14.0);
        let expected = cfg.side_margin + (cfg.content_width() - width) / 2.0;
        assert!((placement.x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_divider_spans_margins() {
        let engine = engine();
        let layout = engine.layout("T", "x", FOOTER);
        let cfg = engine.config();
        let divider = layout.dividers().next().unwrap();
        assert_eq!(divider.x, cfg.side_margin);
        assert_eq!(
            divider.drawable,
            Drawable::Divider {
                x_end: cfg.page_width - cfg.side_margin
            }
        );
    }

    #[test]
    fn test_empty_message_yields_one_blank_line() {
        let layout = engine().layout("Empty", "", FOOTER);
        assert_eq!(layout.body_lines.len(), 1);
        assert_eq!(layout.body_lines[0].text, "");
        assert_eq!(layout.texts(FontRole::Body).count(), 0);
    }

    #[test]
    fn test_footer_stays_below_body_and_above_margin() {
        let engine = engine();
        let cfg = engine.config();
        let long = vec!["row"; 30].join("\n");
        for message in ["", "short", long.as_str()] {
            let layout = engine.layout("Footer", message, FOOTER);
            let footer_y = layout.texts(FontRole::Footer).next().unwrap().1.y;
            assert!(footer_y >= cfg.bottom_margin + cfg.footer_size - 1e-4);
            if let Some((_, last)) = layout.texts(FontRole::Body).last() {
                assert!(footer_y <= last.y - layout.line_height + 1e-4);
            }
        }
    }

    #[test]
    fn test_markers_drawn_once_per_group() {
        let engine = engine();
        let layout = engine.layout(
            "Mixed Items",
            "- Item one with wrapping that should indent properly when it wraps to another line\n\
             Normal paragraph line\n\
             - [ ] Another checkbox item that might wrap to see proper indentation\n\
             - [x] Final item",
            FOOTER,
        );
        let markers: Vec<MarkerKind> = layout.markers().map(|(k, _)| k).collect();
        assert_eq!(
            markers,
            vec![
                MarkerKind::Dash,
                MarkerKind::Checkbox { checked: false },
                MarkerKind::Checkbox { checked: true },
            ]
        );
        for (_, placement) in layout.markers() {
            assert_eq!(placement.x, engine.config().side_margin);
        }

        let mut groups: Vec<usize> = layout.body_lines.iter().map(|l| l.group).collect();
        groups.dedup();
        assert_eq!(groups, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let engine = engine();
        let message = "- [ ] Apples\nA long paragraph that needs wrapping across the narrow receipt roll";
        let a = engine.layout("Same", message, FOOTER);
        let b = engine.layout("Same", message, FOOTER);
        assert_eq!(a, b);
    }

    #[test]
    fn test_page_height_lower_bounds_hold() {
        let engine = engine();
        let long_title = "T".repeat(60);
        for (title, message) in [("", ""), ("Title", "x"), (long_title.as_str(), "a\nb")] {
            let layout = engine.layout(title, message, FOOTER);
            assert!(layout.page_height >= engine.config().min_page_height);
            assert!(layout.page_height >= min_height_bound(&engine, &layout));
        }
    }
}
