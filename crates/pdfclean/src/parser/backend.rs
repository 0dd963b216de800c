use std::collections::BTreeMap;

use lopdf::{self, content::Content};

use crate::CleanError;

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

/// A page identifier mirroring `lopdf::ObjectId`: (object number, generation number).
pub type PageId = (u32, u16);

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// A content-stream operand, reduced to the shapes the text interpreter
/// consumes: numbers, names, strings, and TJ arrays.  Operand kinds that
/// only accompany ignored operators (booleans, dictionaries, inline-image
/// payloads) collapse to [`PdfValue::Other`].
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Other,
}

impl PdfValue {
    /// Numeric value of the operand, accepting both `Integer` and `Real`.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            PdfValue::Integer(i) => Some(*i as f32),
            PdfValue::Real(f) => Some(*f),
            _ => None,
        }
    }
}

/// A single content-stream operation (operator + operands).
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

/// A page's MediaBox in absolute user-space coordinates.
///
/// Run origins produced by the content-stream interpreter are absolute, so
/// in-page checks must compare against the box's actual corners; a MediaBox
/// is not required to start at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl Viewport {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Convert a `lopdf::Object` content-stream operand into a [`PdfValue`].
fn convert_operand(obj: &lopdf::Object) -> PdfValue {
    match obj {
        lopdf::Object::Integer(i) => PdfValue::Integer(*i),
        lopdf::Object::Real(f) => PdfValue::Real(*f),
        lopdf::Object::Name(n) => PdfValue::Name(n.clone()),
        lopdf::Object::String(s, _) => PdfValue::Str(s.clone()),
        lopdf::Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_operand).collect()),
        _ => PdfValue::Other,
    }
}

/// Best-effort decoding of raw PDF string bytes into a Rust `String`.
///
/// Handles three cases in order:
/// 1. UTF-16BE with BOM (`\xFE\xFF` prefix) -- strips BOM and decodes.
/// 2. Valid UTF-8 -- returned as-is.
/// 3. Fallback to Latin-1 (ISO 8859-1) -- each byte mapped to its Unicode
///    code point.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let payload = &bytes[2..];
        let code_units: Vec<u16> = payload
            .chunks(2)
            .filter_map(|chunk| {
                if chunk.len() == 2 {
                    Some(u16::from_be_bytes([chunk[0], chunk[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16_lossy(&code_units);
    }

    // Try UTF-8
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Fallback: Latin-1 (PDFDocEncoding for the printable range).
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// PdfBackend trait
// ---------------------------------------------------------------------------

/// Abstraction over a PDF parsing backend (currently backed by `lopdf`).
///
/// This trait exists so that the reading-order reconstruction can be tested
/// against mock implementations without pulling in the full lopdf dependency.
pub trait PdfBackend {
    /// Return a mapping from 1-based page number to [`PageId`].
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return the page's [`Viewport`] from its MediaBox.
    fn page_viewport(&self, page: PageId) -> Result<Viewport, CleanError>;

    /// Return the raw (possibly compressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>, CleanError>;

    /// Decode raw content-stream bytes into a sequence of [`ContentOp`]s.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, CleanError>;

    /// Decode raw string bytes found in a text-showing operator, using any
    /// font-specific encoding information the backend can find for the given
    /// page and font name.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;
}

// ---------------------------------------------------------------------------
// LopdfBackend
// ---------------------------------------------------------------------------

/// Concrete [`PdfBackend`] implementation backed by [`lopdf::Document`].
pub struct LopdfBackend {
    doc: lopdf::Document,
}

/// Info-dictionary keys surfaced by [`LopdfBackend::metadata`].
const METADATA_KEYS: [&[u8]; 8] = [
    b"Title",
    b"Author",
    b"Creator",
    b"Producer",
    b"Subject",
    b"Keywords",
    b"CreationDate",
    b"ModDate",
];

impl LopdfBackend {
    /// Parse a PDF from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self, CleanError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| CleanError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(CleanError::Encrypted);
        }

        Ok(Self { doc })
    }

    /// Total number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Extract metadata from the PDF trailer's Info dictionary.
    pub fn metadata(&self) -> BTreeMap<String, String> {
        let info_dict = match self.doc.trailer.get(b"Info") {
            Ok(lopdf::Object::Reference(id)) => match self.doc.get_object(*id) {
                Ok(lopdf::Object::Dictionary(d)) => d,
                _ => return BTreeMap::new(),
            },
            Ok(lopdf::Object::Dictionary(d)) => d,
            _ => return BTreeMap::new(),
        };

        METADATA_KEYS
            .iter()
            .filter_map(|&key| {
                let value = match info_dict.get(key).ok()? {
                    lopdf::Object::String(bytes, _) => decode_text_simple(bytes),
                    lopdf::Object::Name(bytes) => String::from_utf8_lossy(bytes).into_owned(),
                    _ => return None,
                };
                Some((String::from_utf8_lossy(key).into_owned(), value))
            })
            .collect()
    }

    // -- private helpers ----------------------------------------------------

    /// Walk up the page tree until a MediaBox array is found, resolving one
    /// level of indirection at each step.
    fn find_media_box(&self, dict: &lopdf::Dictionary) -> Option<[f32; 4]> {
        if let Ok(obj) = dict.get(b"MediaBox") {
            let arr = match obj {
                lopdf::Object::Array(arr) => Some(arr.clone()),
                lopdf::Object::Reference(id) => self
                    .doc
                    .get_object(*id)
                    .ok()
                    .and_then(|o| o.as_array().ok().cloned()),
                _ => None,
            };
            if let Some(arr) = arr {
                return self.box_corners(&arr);
            }
        }

        // MediaBox is inheritable; recurse into Parent.
        let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
        let parent = self.doc.get_object(parent_id).ok()?.as_dict().ok()?;
        self.find_media_box(parent)
    }

    /// Read the four corner numbers out of a MediaBox array, resolving
    /// element-level references.
    fn box_corners(&self, objects: &[lopdf::Object]) -> Option<[f32; 4]> {
        if objects.len() < 4 {
            return None;
        }
        let mut corners = [0.0f32; 4];
        for (slot, obj) in corners.iter_mut().zip(objects) {
            let resolved = match obj {
                lopdf::Object::Reference(id) => self.doc.get_object(*id).ok()?,
                other => other,
            };
            *slot = match resolved {
                lopdf::Object::Integer(i) => *i as f32,
                lopdf::Object::Real(f) => *f,
                _ => return None,
            };
        }
        Some(corners)
    }

    /// Look up the encoding name for a font on a page.
    ///
    /// Returns the encoding name (e.g. `"WinAnsiEncoding"`, `"Identity-H"`)
    /// if declared in the font dictionary, or `None` if no encoding entry
    /// exists or the font cannot be found.
    fn font_encoding_name(&self, page: PageId, font_name: &[u8]) -> Option<String> {
        let fonts = self.doc.get_page_fonts(page).ok()?;
        let font_dict = fonts.get(font_name)?;
        let enc_obj = font_dict.get(b"Encoding").ok()?;
        match enc_obj {
            lopdf::Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// PdfBackend implementation for LopdfBackend
// ---------------------------------------------------------------------------

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    /// The MediaBox array is `[llx, lly, urx, ury]`; all four corners are
    /// preserved so callers can test absolute coordinates against pages
    /// whose box does not start at the origin.
    fn page_viewport(&self, page: PageId) -> Result<Viewport, CleanError> {
        let page_obj = self
            .doc
            .get_object(page)
            .map_err(|e| CleanError::Parse(format!("cannot get page object: {}", e)))?;

        let page_dict = page_obj
            .as_dict()
            .map_err(|e| CleanError::Parse(format!("page object is not a dictionary: {}", e)))?;

        let corners = self
            .find_media_box(page_dict)
            .ok_or_else(|| CleanError::Parse("MediaBox not found for page".into()))?;

        Ok(Viewport {
            x_min: corners[0],
            y_min: corners[1],
            x_max: corners[2],
            y_max: corners[3],
        })
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>, CleanError> {
        self.doc
            .get_page_content(page)
            .map_err(|e| CleanError::Parse(format!("cannot get page content: {}", e)))
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, CleanError> {
        let content = Content::decode(data)
            .map_err(|e| CleanError::Parse(format!("content stream decode error: {}", e)))?;

        let ops = content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_operand).collect(),
            })
            .collect();

        Ok(ops)
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        // Check the font's declared encoding for hints.
        if let Some(enc_name) = self.font_encoding_name(page, font_name) {
            // Identity-H / Identity-V fonts typically use 2-byte CID codes
            // that map to Unicode.  Try UTF-16BE decoding.
            if enc_name.contains("Identity") && bytes.len() >= 2 && bytes.len() % 2 == 0 {
                let code_units: Vec<u16> = bytes
                    .chunks(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                let decoded = String::from_utf16_lossy(&code_units);
                if !decoded.is_empty() && !decoded.chars().all(|c| c == '\u{FFFD}' || c == '\0') {
                    return decoded;
                }
            }
        }

        // Fallback to generic heuristic.
        decode_text_simple(bytes)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
