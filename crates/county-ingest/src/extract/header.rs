//! Header and cell normalization.

use std::borrow::Cow;

/// Decodes a raw cell as UTF-8, falling back to Windows-1252.
///
/// Older Census extracts ship accented place names ("Doña Ana County")
/// in Windows-1252.
pub fn decode_cell(raw: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(raw) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => encoding_rs::WINDOWS_1252.decode_without_bom_handling(raw).0,
    }
}

/// Normalizes a header value: strips a byte-order mark, trims and collapses
/// interior whitespace runs to single spaces.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes a data cell, returning `None` for blanks and sentinel values.
pub fn normalize_cell(raw: &str, null_values: &[String]) -> Option<String> {
    let value = raw.trim().trim_matches('\u{feff}');
    if value.is_empty() || null_values.iter().any(|null| null == value) {
        None
    } else {
        Some(value.to_string())
    }
}
