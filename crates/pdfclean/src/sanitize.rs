//! Text sanitization for the output font's glyph repertoire.
//!
//! Extracted text can carry codepoints the output font has no glyphs for.
//! Sanitization must run before width measurement -- querying the width of
//! a glyph the font cannot render is undefined for the measurement function.

use crate::font::OutputFont;

/// Substituted for every character the output font cannot encode.
pub const PLACEHOLDER: char = '?';

/// Latin ligature codepoints and their letter sequences.
///
/// Source PDFs frequently show "fi"/"fl" as single ligature glyphs; expanding
/// them before sanitization keeps the letters instead of degrading the whole
/// ligature to the placeholder under narrow-repertoire fonts.
const LIGATURES: [(char, &str); 5] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Expand Latin ligature codepoints to their ASCII letter sequences.
///
/// Runs on extracted text, before [`sanitize_for_font`].
pub fn expand_ligatures(text: &str) -> String {
    if !text.chars().any(|c| LIGATURES.iter().any(|&(l, _)| l == c)) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match LIGATURES.iter().find(|&&(l, _)| l == c) {
            Some(&(_, expansion)) => out.push_str(expansion),
            None => out.push(c),
        }
    }
    out
}

/// Whether `c` falls in the Combining Diacritical Marks block.
///
/// Once text runs are extracted in isolation these render as detached marks
/// with no base glyph, corrupting layout rather than improving fidelity.
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Sanitize `text` for rendering with `font`.
///
/// Pure function.  Rules, applied in order, per character:
/// 1. Drop NUL.
/// 2. Drop the Combining Diacritical Marks block.
/// 3. Substitute [`PLACEHOLDER`] for anything the font cannot encode.
///
/// The substitution is 1-for-1 -- it never removes or merges characters, so
/// line and paragraph structure survives for the wrap step.  Newlines pass
/// through untouched: they are structure, not glyphs.
pub fn sanitize_for_font(text: &str, font: &dyn OutputFont) -> String {
    text.chars()
        .filter(|&c| c != '\0' && !is_combining_mark(c))
        .map(|c| {
            if c == '\n' || font.can_encode(c) {
                c
            } else {
                PLACEHOLDER
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
