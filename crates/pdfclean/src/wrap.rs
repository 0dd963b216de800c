//! Greedy word-wrap using real measured glyph widths.

use crate::font::OutputFont;

/// Wrap one paragraph into lines no wider than `max_width` at `font_size`.
///
/// Greedy: packs as many whitespace-delimited words as fit before breaking,
/// with no lookahead balancing.  Guarantees every emitted line measures at
/// most `max_width`, with one deliberate exception: a single word that is
/// wider than `max_width` on its own is emitted unbroken on its own line
/// (graphemes are never split).
///
/// An empty or whitespace-only paragraph produces exactly one empty line,
/// preserving intentional blank separators between paragraphs.
pub fn wrap_paragraph(
    paragraph: &str,
    font: &dyn OutputFont,
    font_size: f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut buffer = String::new();

    for word in paragraph.split_whitespace() {
        let candidate = if buffer.is_empty() {
            word.to_string()
        } else {
            format!("{buffer} {word}")
        };

        if font.text_width(&candidate, font_size) > max_width && !buffer.is_empty() {
            lines.push(std::mem::take(&mut buffer));
            buffer.push_str(word);
        } else {
            buffer = candidate;
        }
    }

    // The trailing buffer is always emitted, even when empty -- this is what
    // turns blank paragraphs into blank output lines.
    lines.push(buffer);
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{BuiltinFont, OutputFont};

    /// Deterministic test font: every character is half an em wide.
    struct FixedWidthFont;

    impl OutputFont for FixedWidthFont {
        fn name(&self) -> &str {
            "Fixed"
        }

        fn can_encode(&self, _c: char) -> bool {
            true
        }

        fn text_width(&self, text: &str, size: f32) -> f32 {
            text.chars().count() as f32 * size * 0.5
        }

        fn register(&self, doc: &mut lopdf::Document, _text: &str) -> lopdf::ObjectId {
            doc.add_object(lopdf::Object::Dictionary(lopdf::Dictionary::new()))
        }

        fn show_text_operand(&self, text: &str) -> lopdf::Object {
            lopdf::Object::String(text.as_bytes().to_vec(), lopdf::StringFormat::Literal)
        }
    }

    // At size 10, each char is 5 units wide for FixedWidthFont.

    #[test]
    fn short_paragraph_stays_on_one_line() {
        let lines = wrap_paragraph("hello world", &FixedWidthFont, 10.0, 100.0);
        assert_eq!(lines, vec!["hello world".to_string()]);
    }

    #[test]
    fn breaks_when_candidate_exceeds_width() {
        // "aaaa bbbb" measures 45; limit 40 forces a break after "aaaa".
        let lines = wrap_paragraph("aaaa bbbb", &FixedWidthFont, 10.0, 40.0);
        assert_eq!(lines, vec!["aaaa".to_string(), "bbbb".to_string()]);
    }

    #[test]
    fn empty_paragraph_yields_one_empty_line() {
        assert_eq!(wrap_paragraph("", &FixedWidthFont, 10.0, 100.0), vec![String::new()]);
    }

    #[test]
    fn whitespace_only_paragraph_yields_one_empty_line() {
        assert_eq!(
            wrap_paragraph("   \t ", &FixedWidthFont, 10.0, 100.0),
            vec![String::new()]
        );
    }

    #[test]
    fn overlong_single_word_is_emitted_unbroken() {
        let word = "a".repeat(50); // 250 units wide at size 10
        let lines = wrap_paragraph(&word, &FixedWidthFont, 10.0, 40.0);
        assert_eq!(lines, vec![word]);
    }

    #[test]
    fn overlong_word_between_normal_words_gets_its_own_line() {
        let text = format!("ok {} ok", "z".repeat(50));
        let lines = wrap_paragraph(&text, &FixedWidthFont, 10.0, 40.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ok");
        assert_eq!(lines[1], "z".repeat(50));
        assert_eq!(lines[2], "ok");
    }

    #[test]
    fn wrapping_is_deterministic() {
        let text = "the quick brown fox jumps over the lazy dog repeatedly";
        let a = wrap_paragraph(text, &FixedWidthFont, 10.0, 80.0);
        let b = wrap_paragraph(text, &FixedWidthFont, 10.0, 80.0);
        assert_eq!(a, b);
    }

    #[test]
    fn no_line_exceeds_width_with_real_metrics() {
        let font = BuiltinFont::helvetica();
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
                    eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim \
                    ad minim veniam, quis nostrud exercitation ullamco laboris.";
        let lines = wrap_paragraph(text, &font, 11.0, 512.0);
        assert!(lines.len() > 1, "paragraph should require wrapping");
        for line in &lines {
            assert!(
                font.text_width(line, 11.0) <= 512.0,
                "line too wide: {:?}",
                line
            );
        }
    }

    #[test]
    fn words_are_preserved_in_order() {
        let text = "one two three four five six seven eight nine ten";
        let lines = wrap_paragraph(text, &FixedWidthFont, 10.0, 60.0);
        let rejoined: Vec<&str> = lines
            .iter()
            .flat_map(|l| l.split_whitespace())
            .collect();
        assert_eq!(rejoined.join(" "), text);
    }
}
