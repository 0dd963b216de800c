//! Built-in fallback font: Helvetica with standard AFM metrics.
//!
//! Used when no bundled Unicode font can be loaded.  Coverage is
//! Latin-1-like (printable ASCII plus U+00A0..U+00FF), rendered through the
//! viewer's own Helvetica via WinAnsiEncoding -- no font program is embedded.

use lopdf::{Dictionary, Object, StringFormat};

use super::OutputFont;

/// Glyph widths for Helvetica, codes 0x20..=0x7E, in 1/1000 em units
/// (Adobe AFM values).
#[rustfmt::skip]
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, // 0x20 ' ' .. 0x29 ')'
    389, 584, 278, 333, 278, 278, 556, 556, 556, 556, // 0x2A '*' .. 0x33 '3'
    556, 556, 556, 556, 556, 556, 278, 278, 584, 584, // 0x34 '4' .. 0x3D '='
    584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, // 0x3E '>' .. 0x47 'G'
    722, 278, 500, 667, 556, 833, 722, 778, 667, 778, // 0x48 'H' .. 0x51 'Q'
    722, 667, 611, 722, 667, 944, 667, 667, 611, 278, // 0x52 'R' .. 0x5B '['
    278, 278, 469, 556, 333, 556, 556, 500, 556, 556, // 0x5C '\' .. 0x65 'e'
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 0x66 'f' .. 0x6F 'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, // 0x70 'p' .. 0x79 'y'
    500, 334, 260, 334, 584,                           // 0x7A 'z' .. 0x7E '~'
];

/// Glyph widths for Helvetica, codes 0xA0..=0xFF (Latin-1 supplement).
#[rustfmt::skip]
const LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, // 0xA0 nbsp .. 0xA9 (c)
    370, 556, 584, 333, 737, 333, 400, 584, 333, 333, // 0xAA ª .. 0xB3 ³
    333, 556, 537, 278, 333, 333, 365, 556, 834, 834, // 0xB4 ´ .. 0xBD ½
    834, 611, 667, 667, 667, 667, 667, 667, 1000, 722, // 0xBE ¾ .. 0xC7 Ç
    667, 667, 667, 667, 278, 278, 278, 278, 722, 722, // 0xC8 È .. 0xD1 Ñ
    778, 778, 778, 778, 778, 584, 778, 722, 722, 722, // 0xD2 Ò .. 0xDB Û
    722, 667, 667, 611, 556, 556, 556, 556, 556, 556, // 0xDC Ü .. 0xE5 å
    889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE6 æ .. 0xEF ï
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, // 0xF0 ð .. 0xF9 ù
    556, 556, 556, 500, 556, 500,                      // 0xFA ú .. 0xFF ÿ
];

/// Width of `?`, the substitution placeholder, used as a defensive default
/// for characters that slipped past sanitization.
const FALLBACK_WIDTH: u16 = 556;

/// A non-embedded standard font with fixed, narrow glyph coverage.
pub struct BuiltinFont {
    name: &'static str,
}

impl BuiltinFont {
    pub fn helvetica() -> Self {
        Self { name: "Helvetica" }
    }

    /// Map a character to its WinAnsi code, if the repertoire covers it.
    ///
    /// Printable ASCII and the Latin-1 supplement map to their own code
    /// points under WinAnsiEncoding; the 0x80..0x9F vendor block is not
    /// claimed.
    fn code_for(c: char) -> Option<u8> {
        match c as u32 {
            cp @ 0x20..=0x7E => Some(cp as u8),
            cp @ 0xA0..=0xFF => Some(cp as u8),
            _ => None,
        }
    }

    /// AFM width of `c` in 1/1000 em units.
    fn width_units(c: char) -> Option<u16> {
        let code = Self::code_for(c)?;
        match code {
            0x20..=0x7E => Some(ASCII_WIDTHS[(code - 0x20) as usize]),
            0xA0..=0xFF => Some(LATIN1_WIDTHS[(code - 0xA0) as usize]),
            _ => None,
        }
    }
}

impl OutputFont for BuiltinFont {
    fn name(&self) -> &str {
        self.name
    }

    fn can_encode(&self, c: char) -> bool {
        Self::code_for(c).is_some()
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| u32::from(Self::width_units(c).unwrap_or(FALLBACK_WIDTH)))
            .sum();
        units as f32 * size / 1000.0
    }

    fn register(&self, doc: &mut lopdf::Document, _text: &str) -> lopdf::ObjectId {
        let mut font = Dictionary::new();
        font.set("Type", Object::Name(b"Font".to_vec()));
        font.set("Subtype", Object::Name(b"Type1".to_vec()));
        font.set("BaseFont", Object::Name(self.name.as_bytes().to_vec()));
        font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        doc.add_object(Object::Dictionary(font))
    }

    fn show_text_operand(&self, text: &str) -> Object {
        let bytes: Vec<u8> = text
            .chars()
            .map(|c| Self::code_for(c).unwrap_or(b'?'))
            .collect();
        Object::String(bytes, StringFormat::Literal)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
