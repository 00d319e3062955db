//! Character reference decoding for text and attribute values.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! The template tokenizer scans a whole text run or attribute value first
//! and decodes references afterwards, so this works on finished slices
//! rather than character by character.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

/// The named character references this tokenizer knows, keyed by name
/// without the leading `&`.
///
/// The full table has 2,231 entries; templates overwhelmingly use the few
/// below. Names without a trailing semicolon are the legacy forms that are
/// still recognized without one.
static NAMED_CHARACTER_REFERENCES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        HashMap::from([
            ("amp;", "&"),
            ("amp", "&"),
            ("lt;", "<"),
            ("lt", "<"),
            ("gt;", ">"),
            ("gt", ">"),
            ("quot;", "\""),
            ("quot", "\""),
            ("apos;", "'"),
            ("nbsp;", "\u{00A0}"),
            ("nbsp", "\u{00A0}"),
            ("copy;", "\u{00A9}"),
            ("copy", "\u{00A9}"),
            ("reg;", "\u{00AE}"),
            ("reg", "\u{00AE}"),
            ("trade;", "\u{2122}"),
            ("times;", "\u{00D7}"),
            ("divide;", "\u{00F7}"),
            ("mdash;", "\u{2014}"),
            ("ndash;", "\u{2013}"),
            ("hellip;", "\u{2026}"),
            ("laquo;", "\u{00AB}"),
            ("raquo;", "\u{00BB}"),
            ("larr;", "\u{2190}"),
            ("rarr;", "\u{2192}"),
        ])
    });

/// The longest name in [`NAMED_CHARACTER_REFERENCES`], semicolon included.
const LONGEST_NAME: usize = 7;

/// Look up a named character reference (`name` without the leading `&`).
#[must_use]
pub fn lookup_named_reference(name: &str) -> Option<&'static str> {
    NAMED_CHARACTER_REFERENCES.get(name).copied()
}

/// Decode every character reference in `raw`.
///
/// Unknown references are left as written. In attribute values, a legacy
/// reference without its semicolon that is followed by `=` or an
/// alphanumeric character is also left alone, as browsers do for URLs like
/// `?a=1&copy=2`.
#[must_use]
pub fn decode_character_references(raw: &str, in_attribute: bool) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let (replacement, consumed) = if let Some(numeric) = after.strip_prefix('#') {
            decode_numeric(numeric).map_or((None, 0), |(ch, len)| (Some(ch.to_string()), len + 1))
        } else {
            decode_named(after, in_attribute).map_or((None, 0), |(text, len)| (Some(text.to_string()), len))
        };

        match replacement {
            Some(text) => {
                decoded.push_str(&text);
                rest = &after[consumed..];
            }
            None => {
                decoded.push('&');
                rest = after;
            }
        }
    }
    decoded.push_str(rest);
    Cow::Owned(decoded)
}

/// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
///
/// "Consume the maximum number of characters possible, where the consumed
/// characters are one of the identifiers in the first column of the named
/// character references table."
fn decode_named(after: &str, in_attribute: bool) -> Option<(&'static str, usize)> {
    let run = after
        .bytes()
        .take(LONGEST_NAME)
        .take_while(u8::is_ascii_alphanumeric)
        .count();

    if after[run..].starts_with(';')
        && let Some(text) = lookup_named_reference(&after[..=run])
    {
        return Some((text, run + 1));
    }

    (1..=run).rev().find_map(|len| {
        let text = lookup_named_reference(&after[..len])?;
        // "If the character reference was consumed as part of an attribute,
        // and the last character matched is not a U+003B SEMICOLON character
        // (;), and the next input character is either a U+003D EQUALS SIGN
        // character (=) or an ASCII alphanumeric, then, for historical
        // reasons, flush code points consumed as a character reference and
        // switch to the return state."
        let next = after.as_bytes().get(len);
        let historical = next.is_some_and(|&b| b == b'=' || b.is_ascii_alphanumeric());
        (!(in_attribute && historical)).then_some((text, len))
    })
}

/// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
///
/// `numeric` starts right after `&#`. Returns the character and the number
/// of bytes consumed from `numeric`.
fn decode_numeric(numeric: &str) -> Option<(char, usize)> {
    let (radix, prefix) = match numeric.as_bytes().first() {
        Some(b'x' | b'X') => (16, 1),
        _ => (10, 0),
    };
    let digits = numeric[prefix..]
        .bytes()
        .take_while(|b| char::from(*b).is_digit(radix))
        .count();
    // "absence-of-digits-in-numeric-character-reference": nothing is consumed.
    if digits == 0 {
        return None;
    }

    let code = numeric[prefix..prefix + digits]
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0u32, |acc, digit| acc.saturating_mul(radix).saturating_add(digit));

    // [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    // "If the number is 0x00, then this is a null-character-reference parse
    // error. Set the character reference code to 0xFFFD." Surrogates and
    // values past 0x10FFFF are replaced the same way.
    let ch = match code {
        0 => char::REPLACEMENT_CHARACTER,
        code => char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER),
    };

    let mut consumed = prefix + digits;
    if numeric[consumed..].starts_with(';') {
        consumed += 1;
    }
    Some((ch, consumed))
}
