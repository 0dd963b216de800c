//! Bundled Unicode font, parsed with ttf-parser and embedded in output
//! documents as a CIDFontType2 / Identity-H Type0 font.
//!
//! The face is parsed once at load time into owned lookup tables (codepoint
//! -> glyph id, glyph id -> advance) so the font can be shared across
//! requests without keeping a borrowing `Face` alive.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use lopdf::{Dictionary, Object, Stream, StringFormat};
use ttf_parser::{Face, GlyphId};

use super::{FontError, OutputFont};

/// A TrueType/OpenType font loaded from disk.
pub struct EmbeddedFont {
    postscript_name: String,
    data: Vec<u8>,
    units_per_em: u16,
    /// Unicode codepoint -> glyph id, merged across all Unicode cmap
    /// subtables.
    glyphs: HashMap<char, u16>,
    /// Horizontal advance per glyph id, in font units.
    advances: Vec<u16>,
    ascent: i16,
    descent: i16,
    cap_height: i16,
    bbox: [i16; 4],
}

impl EmbeddedFont {
    /// Load and parse the font file at `path`.
    pub fn load(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Parse an in-memory font program.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, FontError> {
        let face = Face::parse(&data, 0).map_err(|e| FontError::Parse(e.to_string()))?;

        let cmap = face
            .tables()
            .cmap
            .ok_or(FontError::NoUnicodeCmap)?;

        let mut glyphs: HashMap<char, u16> = HashMap::new();
        for subtable in cmap.subtables {
            if !subtable.is_unicode() {
                continue;
            }
            subtable.codepoints(|cp| {
                if let Some(c) = char::from_u32(cp) {
                    if let Some(gid) = subtable.glyph_index(cp) {
                        if gid.0 != 0 {
                            glyphs.entry(c).or_insert(gid.0);
                        }
                    }
                }
            });
        }
        if glyphs.is_empty() {
            return Err(FontError::NoUnicodeCmap);
        }

        let glyph_count = face.number_of_glyphs();
        let advances: Vec<u16> = (0..glyph_count)
            .map(|gid| face.glyph_hor_advance(GlyphId(gid)).unwrap_or(0))
            .collect();

        let postscript_name = face
            .names()
            .into_iter()
            .find(|n| n.name_id == ttf_parser::name_id::POST_SCRIPT_NAME && n.is_unicode())
            .and_then(|n| n.to_string())
            .unwrap_or_else(|| "EmbeddedFont".to_string());

        let units_per_em = face.units_per_em();
        let ascent = face.ascender();
        let descent = face.descender();
        let cap_height = face.capital_height().unwrap_or(ascent);
        let rect = face.global_bounding_box();
        let bbox = [rect.x_min, rect.y_min, rect.x_max, rect.y_max];

        Ok(Self {
            postscript_name,
            units_per_em,
            glyphs,
            advances,
            ascent,
            descent,
            cap_height,
            bbox,
            data,
        })
    }

    /// Glyph id for `c`, substituting the placeholder's glyph (and finally
    /// .notdef) for anything outside the repertoire.
    fn glyph_for(&self, c: char) -> u16 {
        self.glyphs
            .get(&c)
            .or_else(|| self.glyphs.get(&'?'))
            .copied()
            .unwrap_or(0)
    }

    /// Convert font units to PDF glyph-space units (1/1000 em).
    fn to_milliem(&self, units: i32) -> i64 {
        (units as f32 * 1000.0 / self.units_per_em as f32).round() as i64
    }

    fn advance_units(&self, gid: u16) -> u16 {
        self.advances.get(gid as usize).copied().unwrap_or(0)
    }
}

impl OutputFont for EmbeddedFont {
    fn name(&self) -> &str {
        &self.postscript_name
    }

    fn can_encode(&self, c: char) -> bool {
        self.glyphs.contains_key(&c)
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u64 = text
            .chars()
            .map(|c| u64::from(self.advance_units(self.glyph_for(c))))
            .sum();
        units as f32 * size / self.units_per_em as f32
    }

    /// Build the Type0 font object graph: font program stream, descriptor,
    /// CIDFontType2 descendant with a width array restricted to the glyphs
    /// `text` actually uses, and the Identity-H composite font dictionary.
    fn register(&self, doc: &mut lopdf::Document, text: &str) -> lopdf::ObjectId {
        // Font program.
        let mut file_dict = Dictionary::new();
        file_dict.set("Length1", Object::Integer(self.data.len() as i64));
        let font_file_id = doc.add_object(Object::Stream(Stream::new(file_dict, self.data.clone())));

        // Descriptor.
        let mut descriptor = Dictionary::new();
        descriptor.set("Type", Object::Name(b"FontDescriptor".to_vec()));
        descriptor.set(
            "FontName",
            Object::Name(self.postscript_name.as_bytes().to_vec()),
        );
        descriptor.set("Flags", Object::Integer(32)); // nonsymbolic
        descriptor.set(
            "FontBBox",
            Object::Array(
                self.bbox
                    .iter()
                    .map(|&v| Object::Integer(self.to_milliem(v as i32)))
                    .collect(),
            ),
        );
        descriptor.set("ItalicAngle", Object::Integer(0));
        descriptor.set("Ascent", Object::Integer(self.to_milliem(self.ascent as i32)));
        descriptor.set(
            "Descent",
            Object::Integer(self.to_milliem(self.descent as i32)),
        );
        descriptor.set(
            "CapHeight",
            Object::Integer(self.to_milliem(self.cap_height as i32)),
        );
        descriptor.set("StemV", Object::Integer(80));
        descriptor.set("FontFile2", Object::Reference(font_file_id));
        let descriptor_id = doc.add_object(Object::Dictionary(descriptor));

        // Width array for the glyphs the document uses ('?' always included
        // because the sanitizer may have substituted it).
        let used: BTreeSet<u16> = text
            .chars()
            .chain(['?', ' '])
            .map(|c| self.glyph_for(c))
            .collect();
        let mut widths: Vec<Object> = Vec::with_capacity(used.len() * 2);
        for gid in used {
            widths.push(Object::Integer(gid as i64));
            widths.push(Object::Array(vec![Object::Integer(
                self.to_milliem(self.advance_units(gid) as i32),
            )]));
        }

        // CIDFontType2 descendant.
        let mut cid_info = Dictionary::new();
        cid_info.set(
            "Registry",
            Object::String(b"Adobe".to_vec(), StringFormat::Literal),
        );
        cid_info.set(
            "Ordering",
            Object::String(b"Identity".to_vec(), StringFormat::Literal),
        );
        cid_info.set("Supplement", Object::Integer(0));

        let mut descendant = Dictionary::new();
        descendant.set("Type", Object::Name(b"Font".to_vec()));
        descendant.set("Subtype", Object::Name(b"CIDFontType2".to_vec()));
        descendant.set(
            "BaseFont",
            Object::Name(self.postscript_name.as_bytes().to_vec()),
        );
        descendant.set("CIDSystemInfo", Object::Dictionary(cid_info));
        descendant.set("FontDescriptor", Object::Reference(descriptor_id));
        descendant.set("DW", Object::Integer(1000));
        descendant.set("W", Object::Array(widths));
        descendant.set("CIDToGIDMap", Object::Name(b"Identity".to_vec()));
        let descendant_id = doc.add_object(Object::Dictionary(descendant));

        // Composite font.
        let mut font = Dictionary::new();
        font.set("Type", Object::Name(b"Font".to_vec()));
        font.set("Subtype", Object::Name(b"Type0".to_vec()));
        font.set(
            "BaseFont",
            Object::Name(self.postscript_name.as_bytes().to_vec()),
        );
        font.set("Encoding", Object::Name(b"Identity-H".to_vec()));
        font.set(
            "DescendantFonts",
            Object::Array(vec![Object::Reference(descendant_id)]),
        );
        doc.add_object(Object::Dictionary(font))
    }

    fn show_text_operand(&self, text: &str) -> Object {
        // Identity-H: two big-endian bytes per glyph id.
        let mut bytes = Vec::with_capacity(text.chars().count() * 2);
        for c in text.chars() {
            let gid = self.glyph_for(c);
            bytes.extend_from_slice(&gid.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
