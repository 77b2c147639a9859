//! Static glyph-advance tables for the three receipt font roles.
//!
//! Widths are the standard Helvetica AFM advances in 1/1000 em, so a string's
//! width in points is `sum(advance) * size / 1000`. Every advance is
//! non-negative, which makes `measure_str` monotonic as text grows. The greedy
//! wrapper relies on that.
//!
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32. A handful of WinAnsi extras (dashes, quotes,
//! bullet) are looked up in a side table; anything else uses `default_width`.

use serde::{Deserialize, Serialize};
use tracing::debug;

// ────────────────────────────────────────────────────────────────────────────
// Font roles
// ────────────────────────────────────────────────────────────────────────────

/// The three faces a receipt uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontRole {
    /// Title line, Helvetica-Bold.
    Title,
    /// Message body, Helvetica.
    Body,
    /// Attribution footer, Helvetica-Oblique.
    Footer,
}

impl FontRole {
    pub const ALL: [FontRole; 3] = [FontRole::Title, FontRole::Body, FontRole::Footer];

    /// PostScript name of the standard Type1 face backing this role.
    pub fn base_font(self) -> &'static str {
        match self {
            FontRole::Title => "Helvetica-Bold",
            FontRole::Body => "Helvetica",
            FontRole::Footer => "Helvetica-Oblique",
        }
    }

    /// Resource name used in the page's font dictionary.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontRole::Title => "F1",
            FontRole::Body => "F2",
            FontRole::Footer => "F3",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one font role.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    pub role: FontRole,
    widths: &'static [u16; 95],
    extras: &'static [(char, u16)],
    /// Advance used for glyphs outside both tables.
    pub default_width: u16,
    /// Ascender height in 1/1000 em.
    pub ascent: u16,
}

impl FontMetricTable {
    /// Advance of a single glyph in 1/1000 em.
    pub fn glyph_width(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        self.extras
            .iter()
            .find(|(ch, _)| *ch == c)
            .map_or(self.default_width, |(_, w)| *w)
    }

    pub fn has_glyph(&self, c: char) -> bool {
        (32..=126).contains(&(c as u32)) || self.extras.iter().any(|(ch, _)| *ch == c)
    }

    /// Distinct glyphs in `s` that fall back to `default_width`, in first-seen order.
    pub fn missing_glyphs(&self, s: &str) -> Vec<char> {
        let mut missing: Vec<char> = Vec::new();
        for c in s.chars() {
            if !self.has_glyph(c) && !missing.contains(&c) {
                missing.push(c);
            }
        }
        missing
    }

    /// Emits one debug event per distinct fallback glyph in `s`. `glyph_width`
    /// and `measure_str` never log.
    pub fn report_fallbacks(&self, s: &str) {
        for c in self.missing_glyphs(s) {
            debug!(
                glyph = %c.escape_unicode(),
                font = self.role.base_font(),
                "No metric for glyph, using default advance"
            );
        }
    }

    /// Measures the rendered width of a string in points at `size`.
    pub fn measure_str(&self, s: &str, size: f32) -> f32 {
        let units: u32 = s.chars().map(|c| u32::from(self.glyph_width(c))).sum();
        units as f32 * size / 1000.0
    }

    /// Ascender height as a fraction of the font size.
    pub fn ascent_ratio(&self) -> f32 {
        f32::from(self.ascent) / 1000.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables
// ────────────────────────────────────────────────────────────────────────────

/// Helvetica (regular and oblique share advances).
#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0    1    2    3    4    5    6    7    8    9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    278, 278, 584, 584, 584, 556, 1015,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    278, 278, 278, 469, 556, 333,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // {    |    }    ~
    334, 260, 334, 584,
];

/// Helvetica-Bold.
#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0    1    2    3    4    5    6    7    8    9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    333, 333, 584, 584, 584, 611, 975,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    333, 278, 333, 584, 556, 333,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    // {    |    }    ~
    389, 280, 389, 584,
];

static HELVETICA_EXTRAS: [(char, u16); 10] = [
    ('\u{2013}', 556),  // en dash
    ('\u{2014}', 1000), // em dash
    ('\u{2022}', 350),  // bullet
    ('\u{2018}', 222),
    ('\u{2019}', 222),
    ('\u{201C}', 333),
    ('\u{201D}', 333),
    ('\u{2026}', 1000), // ellipsis
    ('\u{20AC}', 556),  // euro
    ('\u{00B0}', 400),  // degree
];

static HELVETICA_BOLD_EXTRAS: [(char, u16); 10] = [
    ('\u{2013}', 556),
    ('\u{2014}', 1000),
    ('\u{2022}', 350),
    ('\u{2018}', 278),
    ('\u{2019}', 278),
    ('\u{201C}', 500),
    ('\u{201D}', 500),
    ('\u{2026}', 1000),
    ('\u{20AC}', 556),
    ('\u{00B0}', 400),
];

static TITLE_TABLE: FontMetricTable = FontMetricTable {
    role: FontRole::Title,
    widths: &HELVETICA_BOLD_WIDTHS,
    extras: &HELVETICA_BOLD_EXTRAS,
    default_width: 556,
    ascent: 718,
};

static BODY_TABLE: FontMetricTable = FontMetricTable {
    role: FontRole::Body,
    widths: &HELVETICA_WIDTHS,
    extras: &HELVETICA_EXTRAS,
    default_width: 556,
    ascent: 718,
};

static FOOTER_TABLE: FontMetricTable = FontMetricTable {
    role: FontRole::Footer,
    widths: &HELVETICA_WIDTHS,
    extras: &HELVETICA_EXTRAS,
    default_width: 556,
    ascent: 718,
};

/// Returns the static metric table for a font role.
pub fn get_metrics(role: FontRole) -> &'static FontMetricTable {
    match role {
        FontRole::Title => &TITLE_TABLE,
        FontRole::Body => &BODY_TABLE,
        FontRole::Footer => &FOOTER_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
