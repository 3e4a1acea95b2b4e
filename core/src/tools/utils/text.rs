//! Character-safe string helpers

/// Keep at most `max` characters
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Cut `text` when it exceeds `limit` characters, keeping the first `head`
/// and last `tail` characters around `marker`
pub fn truncate_middle(text: &str, limit: usize, head: usize, tail: usize, marker: &str) -> String {
    let total = text.chars().count();
    if total <= limit {
        return text.to_string();
    }

    let start = truncate_chars(text, head);
    let end: String = text.chars().skip(total.saturating_sub(tail)).collect();
    format!("{}{}{}", start, marker, end)
}

/// Normalize a lookup key: lowercase, spaces and hyphens become underscores
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase().replace([' ', '-'], "_")
}
