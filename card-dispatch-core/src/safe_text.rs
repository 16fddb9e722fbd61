//! Safe text for rendering
//!
//! Every user- or server-supplied string must go through one of these before
//! it reaches the screen or a screen-reader announcement.

use std::sync::LazyLock;

use regex::Regex;

/// Longest string kept by [`sanitize`] and [`strip_tags`], in characters.
pub const MAX_TEXT_LEN: usize = 100;

/// Longest accepted product id.
pub const MAX_PRODUCT_ID_LEN: usize = 50;

static PRODUCT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+$").unwrap_or_else(|e| panic!("invalid product id pattern: {e}"))
});

/// Replace `< > & " '` with HTML entities.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape, trim and cap at [`MAX_TEXT_LEN`] characters.
pub fn sanitize(input: &str) -> String {
    truncate(escape_html(input).trim(), MAX_TEXT_LEN)
}

/// Drop angle brackets, trim and cap at [`MAX_TEXT_LEN`] characters.
///
/// For plain-text surfaces where entities would show up literally.
pub fn strip_tags(input: &str) -> String {
    let stripped: String = input.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    truncate(stripped.trim(), MAX_TEXT_LEN)
}

/// Alphanumerics, `-` and `_` only, at most [`MAX_PRODUCT_ID_LEN`] characters.
pub fn is_valid_product_id(id: &str) -> bool {
    id.len() <= MAX_PRODUCT_ID_LEN && PRODUCT_ID.is_match(id)
}

/// Parse a price; anything unparseable, negative or non-finite becomes `0.0`.
pub fn sanitize_price(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => price,
        _ => 0.0,
    }
}

fn truncate(input: &str, max_chars: usize) -> String {
    input.chars().take(max_chars).collect()
}
