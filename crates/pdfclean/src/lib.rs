//! Reflow noisy PDFs into clean, fixed-layout documents.
//!
//! The pipeline has two phases with a plain-text boundary between them:
//!
//! 1. **Extraction** ([`parser`]): interpret each page's content stream,
//!    collect positioned text runs, and reconstruct reading order from
//!    their coordinates.
//! 2. **Composition** ([`compose`]): sanitize the text for the output
//!    font's repertoire, word-wrap it with measured glyph widths, and
//!    paginate it into a brand-new single-column PDF.
//!
//! Nothing from the source document survives into the output except the
//! text itself: no images, no annotations, no fonts, no layout.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

pub mod compose;
pub mod font;
pub mod parser;
pub mod sanitize;
pub mod wrap;

use parser::backend::LopdfBackend;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the cleaning pipeline.
#[derive(Debug, Error)]
pub enum CleanError {
    /// The input could not be parsed as a PDF, or a required structure
    /// (page tree, MediaBox, content stream) was missing or malformed.
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// The document is encrypted; decryption is not supported.
    #[error("document is encrypted")]
    Encrypted,

    /// The output document could not be serialized.
    #[error("PDF render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Options and results
// ---------------------------------------------------------------------------

/// Output page geometry, in PDF points (1/72 inch).
///
/// Defaults describe a US-Letter page with a 50-point margin and 11-point
/// body text.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOptions {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub font_size: f32,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin: 50.0,
            font_size: 11.0,
        }
    }
}

impl CleanOptions {
    /// Horizontal space available for text after both margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }
}

/// Result of cleaning one document.
#[derive(Debug, Clone)]
pub struct CleanedDocument {
    /// The rebuilt PDF.
    pub pdf: Vec<u8>,
    /// The sanitized text the PDF was built from, pages separated by blank
    /// lines.
    pub text: String,
    /// Page count of the **source** document, not of [`pdf`](Self::pdf).
    /// The rebuilt document reflows freely, so its own page count carries
    /// no information about the input.
    pub page_count: usize,
}

/// Document summary: source page count plus any Info-dictionary metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    pub page_count: usize,
    pub metadata: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Clean `bytes` with default US-Letter geometry.
pub fn clean(bytes: &[u8]) -> Result<CleanedDocument, CleanError> {
    clean_with_options(bytes, &CleanOptions::default())
}

/// Clean `bytes` with explicit output geometry.
///
/// Runs the full pipeline: extract, sanitize, wrap, compose.  The returned
/// [`CleanedDocument::text`] is exactly the text rendered into the output
/// PDF.
pub fn clean_with_options(
    bytes: &[u8],
    opts: &CleanOptions,
) -> Result<CleanedDocument, CleanError> {
    let backend = LopdfBackend::load_bytes(bytes)?;
    let page_count = backend.page_count();
    log::info!("cleaning document with {} source pages", page_count);

    let font = font::resolved();

    let raw_pages = parser::layout::extract_document_text(&backend)?;
    let sanitized: Vec<String> = raw_pages
        .iter()
        .map(|page| sanitize::sanitize_for_font(&sanitize::expand_ligatures(page), font))
        .collect();
    let text = sanitized.join("\n\n");

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        lines.extend(wrap::wrap_paragraph(
            paragraph,
            font,
            opts.font_size,
            opts.content_width(),
        ));
    }

    let pdf = compose::compose(&lines, font, opts)?;
    log::debug!(
        "composed {} wrapped lines into {} bytes of output",
        lines.len(),
        pdf.len()
    );

    Ok(CleanedDocument {
        pdf,
        text,
        page_count,
    })
}

/// Extract raw (unsanitized) text from `bytes`, one string per page in
/// reading order.
pub fn extract_text(bytes: &[u8]) -> Result<Vec<String>, CleanError> {
    let backend = LopdfBackend::load_bytes(bytes)?;
    parser::layout::extract_document_text(&backend)
}

/// Number of pages in the source document.
pub fn page_count(bytes: &[u8]) -> Result<usize, CleanError> {
    Ok(LopdfBackend::load_bytes(bytes)?.page_count())
}

/// Page count and Info-dictionary metadata for the source document.
pub fn info(bytes: &[u8]) -> Result<DocumentInfo, CleanError> {
    let backend = LopdfBackend::load_bytes(bytes)?;
    Ok(DocumentInfo {
        page_count: backend.page_count(),
        metadata: backend.metadata(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
