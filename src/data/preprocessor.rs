// ============================================================
// Layer 3 — Text Cleaner
// ============================================================
// Cleans raw text (often scraped HTML) before tokenisation.
//
// Cleaning steps (applied in this exact order; later steps see
// the output of earlier ones, e.g. `&lt;b&gt;` is decoded to
// `<b>` in step 1 and then stripped as a tag in step 6):
//   1. Decode HTML character refs      &amp; &amp &#128; → & & €
//   2. Remove straight double quotes   "
//   3. Remove LEFT curly quotes        “  (U+201C only; the right
//                                          quote ” U+201D is kept)
//   4. Remove pipes                    |
//   5. Remove tildes                   ~
//   6. Strip tags matching <[^<]+?>    (non-greedy, not an HTML
//                                          parser: `a < b > c`
//                                          loses "< b >")
//   7. Collapse runs of ASCII spaces   "a   b" → "a b"
//                                       (tabs/newlines untouched)
//
// Reference: regex crate docs (lazy quantifiers)
//            data/entities.rs (HTML5 character references)

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::data::entities::decode_html_entities;
use crate::infra::observe::LogOnError;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<]+?>").unwrap());
static SPACES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").unwrap());

/// Characters removed outright in steps 2-5.
const STRIPPED_CHARS: [char; 4] = ['"', '\u{201C}', '|', '~'];

/// Clean a text string for downstream tokenisation.
pub fn clean_text(text: &str) -> String {
    // ── Step 1: HTML entities ─────────────────────────────────────────────────
    let decoded = decode_html_entities(text);

    // ── Steps 2-5: Character removal ──────────────────────────────────────────
    let stripped: String = decoded
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();

    // ── Step 6: Tags ──────────────────────────────────────────────────────────
    let untagged = TAG_RE.replace_all(&stripped, "");

    // ── Step 7: Space runs ────────────────────────────────────────────────────
    SPACES_RE.replace_all(&untagged, " ").into_owned()
}

/// Decode raw bytes as UTF-8, then [`clean_text`] them.
///
/// Invalid UTF-8 is logged and returned as the original
/// `std::str::Utf8Error`.
pub fn clean_bytes(raw: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(raw)
        .map_err(anyhow::Error::from)
        .log_on_error()?;

    let cleaned = clean_text(text);
    tracing::debug!("Cleaned {} bytes into {} bytes", raw.len(), cleaned.len());
    Ok(cleaned)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_entities() {
        let out = clean_text("Tom &amp; Jerry");
        assert_eq!(out, "Tom & Jerry");
        assert!(!out.contains("&amp;"));
    }

    #[test]
    fn test_decodes_legacy_and_numeric_refs() {
        assert_eq!(clean_text("a &copy 2020 &lt &#128;5"), "a \u{A9} 2020 < \u{20AC}5");
        // &#147; decodes to the left curly quote, which step 3 then removes
        assert_eq!(clean_text("&#147;hi&#148;"), "hi\u{201D}");
    }

    #[test]
    fn test_removes_target_characters() {
        let out = clean_text("say \"hi\" | “quoted ~tilde");
        for c in ['"', '\u{201C}', '|', '~'] {
            assert!(!out.contains(c), "found {c:?} in {out:?}");
        }
        assert_eq!(out, "say hi quoted tilde");
    }

    #[test]
    fn test_keeps_closing_curly_quote() {
        assert_eq!(clean_text("a\u{201D}b"), "a\u{201D}b");
        assert_eq!(clean_text("\u{201C}a\u{201D}"), "a\u{201D}");
    }

    #[test]
    fn test_strips_tags() {
        assert_eq!(clean_text("<b>hi</b>"), "hi");
        assert_eq!(clean_text("<p class=\"x\">one</p> <br/>two"), "one two");
    }

    #[test]
    fn test_tag_pattern_is_not_an_html_parser() {
        // Everything between the first `<` and the next `>` goes
        assert_eq!(clean_text("a < b > c"), "a c");
        // A lone `<` with no closing `>` stays
        assert_eq!(clean_text("1 < 2"), "1 < 2");
    }

    #[test]
    fn test_decoded_entities_feed_later_steps() {
        assert_eq!(clean_text("&lt;b&gt;bold&lt;/b&gt;"), "bold");
        assert_eq!(clean_text("&quot;quoted&quot;"), "quoted");
    }

    #[test]
    fn test_collapses_spaces_only() {
        assert_eq!(clean_text("a   b"), "a b");
        assert_eq!(clean_text("a\t\tb"), "a\t\tb");
        assert_eq!(clean_text("a\n\n  b"), "a\n\n b");
    }

    #[test]
    fn test_idempotent_on_clean_input() {
        let once = clean_text("Plain   text with <i>tags</i> and ” marks");
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_clean_bytes_accepts_utf8() {
        assert_eq!(clean_bytes("x  | y".as_bytes()).unwrap(), "x y");
    }

    #[test]
    fn test_clean_bytes_propagates_utf8_error() {
        let err = clean_bytes(&[b'o', b'k', 0xFF, 0xFE]).unwrap_err();
        assert!(err.downcast_ref::<std::str::Utf8Error>().is_some());
    }
}
