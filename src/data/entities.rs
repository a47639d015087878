// ============================================================
// Layer 3 — HTML Character Reference Decoding
// ============================================================
// Decodes `&name;`, `&#65;` and `&#x41;` the way HTML5 parsers
// do, including the forgiving cases scraped text is full of:
//
//   &amp  &lt  &copy 2020     legacy names, no semicolon needed
//   &ampxyz;                  longest legacy prefix wins → &xyz;
//   &#128; … &#159;           Windows-1252 mapping (€, ‘, ’, “, ”)
//   &#0;  &#xD800;  &#x110000; → U+FFFD
//   &#1;  &#xFFFE;            non-characters/controls → removed
//   &unknown;  AT&T           left as they are
//
// Reference: WHATWG HTML §13.2.5.72 (Character reference state)

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

use crate::data::entity_table::HTML5_ENTITIES;

static CHARREF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[^\t\n\x0C <&#;]{1,32};?)").unwrap()
});

/// Decode every HTML character reference in `text`.
pub fn decode_html_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    CHARREF_RE.replace_all(text, |caps: &Captures| replace_charref(&caps[1]))
}

fn replace_charref(reference: &str) -> String {
    match reference.strip_prefix('#') {
        Some(numeric) => decode_numeric(numeric),
        None          => decode_named(reference),
    }
}

fn decode_numeric(numeric: &str) -> String {
    let (digits, radix) = match numeric.strip_prefix(|c: char| c == 'x' || c == 'X') {
        Some(hex) => (hex, 16),
        None      => (numeric, 10),
    };
    let digits = digits.trim_end_matches(';');

    // Digits that overflow u32 are past U+10FFFF anyway
    let Ok(code) = u32::from_str_radix(digits, radix) else {
        return '\u{FFFD}'.to_string();
    };

    if let Some(c) = windows_1252_override(code) {
        return c.to_string();
    }
    if (0xD800..=0xDFFF).contains(&code) || code > 0x10FFFF {
        return '\u{FFFD}'.to_string();
    }
    if is_dropped_codepoint(code) {
        return String::new();
    }
    char::from_u32(code).map(String::from).unwrap_or_default()
}

fn decode_named(name: &str) -> String {
    if let Some(value) = lookup(name) {
        return value.to_string();
    }

    // Longest legacy prefix of at least two characters
    let boundaries: Vec<usize> = name.char_indices().map(|(i, _)| i).skip(2).collect();
    for &end in boundaries.iter().rev() {
        if let Some(value) = lookup(&name[..end]) {
            return format!("{}{}", value, &name[end..]);
        }
    }

    format!("&{}", name)
}

fn lookup(name: &str) -> Option<&'static str> {
    HTML5_ENTITIES
        .binary_search_by(|(key, _)| key.cmp(&name))
        .ok()
        .map(|i| HTML5_ENTITIES[i].1)
}

/// Numeric references the HTML5 parser remaps instead of decoding.
fn windows_1252_override(code: u32) -> Option<char> {
    let c = match code {
        0x00 => '\u{FFFD}',
        0x0D => '\r',
        0x80 => '\u{20AC}',
        0x81 => '\u{81}',
        0x82 => '\u{201A}',
        0x83 => '\u{192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{2C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{160}',
        0x8B => '\u{2039}',
        0x8C => '\u{152}',
        0x8D => '\u{8D}',
        0x8E => '\u{17D}',
        0x8F => '\u{8F}',
        0x90 => '\u{90}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{2DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{161}',
        0x9B => '\u{203A}',
        0x9C => '\u{153}',
        0x9D => '\u{9D}',
        0x9E => '\u{17E}',
        0x9F => '\u{178}',
        _ => return None,
    };
    Some(c)
}

/// Controls and non-characters that decode to nothing.
fn is_dropped_codepoint(code: u32) -> bool {
    matches!(code, 0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F..=0x9F | 0xFDD0..=0xFDEF)
        || (code & 0xFFFE) == 0xFFFE
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    // Expected values taken from CPython's html.unescape
    const CASES: &[(&str, &str)] = &[
        ("&amp", "&"),
        ("&lt", "<"),
        ("&AMP;", "&"),
        ("&lt;b&gt;", "<b>"),
        ("a &copy 2020", "a \u{A9} 2020"),
        ("&nbsp;", "\u{A0}"),
        ("&NotEqualTilde;", "\u{2242}\u{338}"),
        ("&ampxyz;", "&xyz;"),
        ("&notit;", "\u{AC}it;"),
        ("&unknown;", "&unknown;"),
        ("AT&T", "AT&T"),
        ("&;", "&;"),
        ("&#65", "A"),
        ("&#X41;", "A"),
        ("&#x1F600;", "\u{1F600}"),
        ("&#128;", "\u{20AC}"),
        ("&#147;quoted&#148;", "\u{201C}quoted\u{201D}"),
        ("&#13;", "\r"),
        ("&#0;", "\u{FFFD}"),
        ("&#xD800;", "\u{FFFD}"),
        ("&#x110000;", "\u{FFFD}"),
        ("&#99999999999999999999;", "\u{FFFD}"),
        ("&#1;", ""),
        ("&#xFFFE;", ""),
    ];

    #[test]
    fn test_matches_html5_decoding() {
        for (input, expected) in CASES {
            assert_eq!(decode_html_entities(input), *expected, "input: {input:?}");
        }
    }

    #[test]
    fn test_table_is_sorted() {
        assert!(HTML5_ENTITIES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(decode_html_entities("no refs here"), Cow::Borrowed(_)));
    }
}
