//! Text/binary classification of fetched payloads

/// Bytes inspected when classifying a payload
pub const TEXT_SAMPLE_LIMIT: usize = 64 * 1024;

/// Minimum share of printable ASCII bytes for a payload to count as text
pub const TEXTUAL_THRESHOLD: f64 = 0.8;

/// Returns true when the payload looks like text rather than compressed/binary data
///
/// A payload is textual when more than 80% of its bytes fall in the printable
/// ASCII range (32..=126). Only the first [`TEXT_SAMPLE_LIMIT`] bytes are
/// inspected. An empty payload is textual: there is nothing to decompress.
///
/// # Examples
///
/// ```
/// use sitemap_scout::fetch::is_textual;
///
/// assert!(is_textual(b"Sitemap: https://example.com/sitemap.xml"));
/// assert!(!is_textual(&[0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00]));
/// ```
pub fn is_textual(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(TEXT_SAMPLE_LIMIT)];
    if sample.is_empty() {
        return true;
    }

    let printable = sample.iter().filter(|b| (32..=126).contains(*b)).count();
    (printable as f64 / sample.len() as f64) > TEXTUAL_THRESHOLD
}

/// Returns at most `max_chars` characters of `text`, for diagnostics
pub fn content_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
