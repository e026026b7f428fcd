//! Free-text normalisation for stored suggestion and reply text.
//!
//! Stored text is always the decoded form: markup tags are stripped and HTML
//! entities are decoded once, so downstream consumers (exports, the admin
//! UI) never see `&amp;amp;`-style double encoding.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,6});").expect("valid regex")
});

/// Strip markup tags, decode entities, and trim surrounding whitespace.
pub fn clean_for_storage(text: &str) -> String {
    let stripped = TAG_RE.replace_all(text, "");
    decode_html_entities(&stripped).trim().to_string()
}

/// Decode named and numeric HTML entities in a single pass.
///
/// Unknown named entities and invalid code points are left untouched.
pub fn decode_html_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            decode_entity(body).map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

fn decode_entity(body: &str) -> Option<char> {
    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}

/// Character count (not byte length).
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
