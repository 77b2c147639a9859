//! Page Serializer: writes a computed [`PageLayout`] as a single-page PDF.
//!
//! Object layout: catalog, page tree, one page, one content stream and three
//! standard Type1 fonts (no embedding). Text is shown in WinAnsiEncoding, so
//! strings are converted to Windows-1252 first; characters outside that code
//! page are replaced with `?`.

use encoding_rs::WINDOWS_1252;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};
use tracing::debug;

use crate::errors::ReceiptError;
use crate::layout::engine::{Drawable, MarkerKind, PageLayout};
use crate::layout::font_metrics::FontRole;
use crate::layout::wrap::{CHECKBOX_SIZE_RATIO, DASH_GLYPH};

const DIVIDER_LINE_WIDTH: f32 = 0.5;
const CHECKBOX_LINE_WIDTH: f32 = 0.8;

/// Serializes the layout into PDF bytes.
pub fn render_pdf(layout: &PageLayout) -> Result<Vec<u8>, ReceiptError> {
    if !(layout.page_width > 0.0 && layout.page_height > 0.0) {
        return Err(ReceiptError::Render(format!(
            "invalid page size {:.2}x{:.2}",
            layout.page_width, layout.page_height
        )));
    }

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let page_id = alloc();
    let content_id = alloc();
    let font_ids: Vec<(FontRole, Ref)> = FontRole::ALL.iter().map(|&r| (r, alloc())).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id).kids([page_id]).count(1);

    {
        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, layout.page_width, layout.page_height))
            .parent(pages_id)
            .contents(content_id);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        for (role, font_ref) in &font_ids {
            fonts.pair(Name(role.resource_name().as_bytes()), *font_ref);
        }
        fonts.finish();
        resources.finish();
        page.finish();
    }

    for (role, font_ref) in &font_ids {
        pdf.type1_font(*font_ref)
            .base_font(Name(role.base_font().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let content = build_content(layout);
    pdf.stream(content_id, &content.finish());

    let bytes = pdf.finish();
    debug!(
        bytes = bytes.len(),
        placements = layout.baselines.len(),
        "PDF serialized"
    );
    Ok(bytes)
}

/// One text or path operation per placement, in layout order.
fn build_content(layout: &PageLayout) -> Content {
    let mut content = Content::new();

    for placement in &layout.baselines {
        let (x, y) = (placement.x, placement.y);
        match &placement.drawable {
            Drawable::Text { text, role, size } => {
                show_text(&mut content, text, *role, *size, x, y);
            }
            Drawable::Divider { x_end } => {
                content.set_line_width(DIVIDER_LINE_WIDTH);
                content.move_to(x, y);
                content.line_to(*x_end, y);
                content.stroke();
            }
            Drawable::Marker {
                kind: MarkerKind::Dash,
                size,
            } => {
                show_text(&mut content, DASH_GLYPH, FontRole::Body, *size, x, y);
            }
            Drawable::Marker {
                kind: MarkerKind::Checkbox { checked },
                size,
            } => {
                draw_checkbox(&mut content, x, y, *size * CHECKBOX_SIZE_RATIO, *checked);
            }
        }
    }
    content
}

fn show_text(content: &mut Content, text: &str, role: FontRole, size: f32, x: f32, y: f32) {
    let encoded = encode_win_ansi(text);
    content
        .begin_text()
        .set_font(Name(role.resource_name().as_bytes()), size)
        .next_line(x, y)
        .show(Str(&encoded))
        .end_text();
}

/// Square sitting on the baseline, with a tick when checked.
fn draw_checkbox(content: &mut Content, x: f32, y: f32, side: f32, checked: bool) {
    content.set_line_width(CHECKBOX_LINE_WIDTH);
    content.rect(x, y, side, side);
    content.stroke();
    if checked {
        content.move_to(x + side * 0.2, y + side * 0.5);
        content.line_to(x + side * 0.42, y + side * 0.22);
        content.line_to(x + side * 0.82, y + side * 0.8);
        content.stroke();
    }
}

/// Converts text to Windows-1252 one character at a time; unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for c in text.chars() {
        let (bytes, _, unmappable) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
        if unmappable {
            debug!(glyph = %c.escape_unicode(), "Character not in WinAnsiEncoding");
            out.push(b'?');
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
