//! Output-font resolution and metrics.
//!
//! The rendering side of the pipeline needs exactly two capabilities from a
//! font -- "can you draw this character?" and "how wide is this string?" --
//! plus the ability to embed itself into the output document.  [`OutputFont`]
//! captures those capabilities; [`resolved`] selects one implementation per
//! process and caches it for the process lifetime.

use std::path::Path;
use std::sync::OnceLock;

use thiserror::Error;

pub mod builtin;
pub mod embedded;

pub use builtin::BuiltinFont;
pub use embedded::EmbeddedFont;

/// Errors raised while loading a TrueType/OpenType font.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("font file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("font parse error: {0}")]
    Parse(String),
    #[error("font has no usable Unicode character map")]
    NoUnicodeCmap,
}

// ---------------------------------------------------------------------------
// OutputFont trait
// ---------------------------------------------------------------------------

/// Capability interface for the font used to render output pages.
///
/// Two implementations exist: [`EmbeddedFont`] (a bundled Unicode TTF) and
/// [`BuiltinFont`] (Helvetica metrics with Latin-1-like coverage).  The
/// implementation is selected once at startup and never branched on
/// per-call.
pub trait OutputFont: Send + Sync {
    /// Human-readable font name, used for logging and the PDF BaseFont.
    fn name(&self) -> &str;

    /// Whether the font's glyph repertoire covers `c`.
    fn can_encode(&self, c: char) -> bool;

    /// Measured width of `text` at `size` points.
    ///
    /// Callers must sanitize `text` first -- querying the width of glyphs
    /// the font cannot render is undefined for this function.
    fn text_width(&self, text: &str, size: f32) -> f32;

    /// Add this font's object graph to `doc` and return the font
    /// dictionary's id.  `text` is the complete text the document will
    /// show, so implementations can restrict width tables to used glyphs.
    fn register(&self, doc: &mut lopdf::Document, text: &str) -> lopdf::ObjectId;

    /// Encode `text` as the string operand of a `Tj` operator.
    fn show_text_operand(&self, text: &str) -> lopdf::Object;
}

// ---------------------------------------------------------------------------
// Process-wide resolution
// ---------------------------------------------------------------------------

/// Environment variable overriding the bundled font path.
pub const FONT_PATH_ENV: &str = "PDFCLEAN_FONT";

/// Default location of the bundled Unicode font.
pub const DEFAULT_FONT_PATH: &str = "fonts/NotoSans-Regular.ttf";

static RESOLVED: OnceLock<Box<dyn OutputFont>> = OnceLock::new();

/// Resolve the output font, loading it on first call and caching it for the
/// process lifetime.
///
/// The first caller wins; concurrent callers block until initialization
/// completes.  The font file is not re-checked after the first call, so
/// adding it later has no effect until restart (operational constraint, not
/// a bug).
pub fn resolved() -> &'static dyn OutputFont {
    RESOLVED
        .get_or_init(|| {
            let path = std::env::var(FONT_PATH_ENV)
                .unwrap_or_else(|_| DEFAULT_FONT_PATH.to_string());
            load_font_at(Path::new(&path))
        })
        .as_ref()
}

/// Load the bundled font at `path`, falling back to the built-in Helvetica
/// metrics when it is missing or unparseable.  The fallback is infallible
/// by construction, so font resolution itself cannot fail a request.
fn load_font_at(path: &Path) -> Box<dyn OutputFont> {
    match EmbeddedFont::load(path) {
        Ok(font) => {
            log::info!("using bundled font '{}' from {}", font.name(), path.display());
            Box::new(font)
        }
        Err(e) => {
            log::warn!(
                "bundled font unavailable at {} ({}); falling back to built-in Helvetica",
                path.display(),
                e
            );
            Box::new(BuiltinFont::helvetica())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_is_cached() {
        let a = resolved() as *const dyn OutputFont;
        let b = resolved() as *const dyn OutputFont;
        assert_eq!(a as *const (), b as *const ());
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let font = load_font_at(Path::new("/nonexistent/font.ttf"));
        assert_eq!(font.name(), "Helvetica");
    }
}
