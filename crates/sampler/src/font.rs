//! 8×8 bitmap glyphs.
//!
//! Glyph rows come from the public-domain `font8x8` tables (basic Latin,
//! Latin-1 supplement, Greek). Each row is one byte with bit 0 as the
//! leftmost column. A glyph cell is drawn one em tall and [`ADVANCE_EM`]
//! wide, which keeps digit proportions close to a regular sans face.

use font8x8::{UnicodeFonts, BASIC_FONTS, GREEK_FONTS, LATIN_FONTS};

/// Rows and columns per glyph cell.
pub const CELL: usize = 8;

/// Horizontal advance per character, in ems.
pub const ADVANCE_EM: f64 = 0.6;

/// One 8×8 glyph bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    rows: [u8; CELL],
}

impl Glyph {
    /// Looks up `c`, or `None` when the bitmap font has no glyph for it.
    pub fn lookup(c: char) -> Option<Glyph> {
        BASIC_FONTS
            .get(c)
            .or_else(|| LATIN_FONTS.get(c))
            .or_else(|| GREEK_FONTS.get(c))
            .map(|rows| Glyph { rows })
    }

    /// Whether the cell at `(col, row)` is ink. Outside the cell is blank.
    pub fn ink(&self, col: usize, row: usize) -> bool {
        col < CELL && row < CELL && (self.rows[row] >> col) & 1 == 1
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|&r| r == 0)
    }
}

/// Advance width of `text` at `size` CSS pixels.
pub fn measure(text: &str, size: f64) -> f64 {
    ADVANCE_EM * size * text.chars().count() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_have_ink() {
        for c in '0'..='9' {
            let g = Glyph::lookup(c).unwrap();
            assert!(!g.is_blank(), "{c} is blank");
        }
    }

    #[test]
    fn space_is_blank() {
        assert!(Glyph::lookup(' ').unwrap().is_blank());
    }

    #[test]
    fn latin_and_greek_fallbacks_resolve() {
        assert!(Glyph::lookup('é').is_some());
        assert!(Glyph::lookup('λ').is_some());
    }

    #[test]
    fn unsupported_script_has_no_glyph() {
        assert!(Glyph::lookup('ص').is_none());
    }

    #[test]
    fn ink_outside_cell_is_blank() {
        let g = Glyph::lookup('0').unwrap();
        assert!(!g.ink(8, 0));
        assert!(!g.ink(0, 8));
    }

    #[test]
    fn measure_is_monospaced() {
        assert!((measure("404", 200.0) - 360.0).abs() < 1e-9);
        assert_eq!(measure("", 200.0), 0.0);
        assert_eq!(measure("ab", 10.0), measure("xy", 10.0));
    }
}
