//! Name normalization for cross-source comparison

/// Strip trailing injury/suspension tags (" INJ", " SUS") from a display
/// name. Tags can stack in older files, so stripping repeats.
pub fn strip_status_tag(raw: &str) -> &str {
    let mut name = raw.trim();
    while name.ends_with(" INJ") || name.ends_with(" SUS") {
        name = name[..name.len() - 4].trim_end();
    }
    name
}

/// Normalized comparison key: status tag stripped, lowercased, everything
/// outside `[a-z0-9]` removed. Total; empty input yields an empty key.
pub fn normalize(raw: &str) -> String {
    strip_status_tag(raw)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Lowercased final whitespace token of the status-stripped name
pub fn last_name(raw: &str) -> Option<String> {
    strip_status_tag(raw).split_whitespace().last().map(|token| token.to_lowercase())
}

/// Lowercased first character of the status-stripped full name
pub fn first_initial(raw: &str) -> Option<char> {
    strip_status_tag(raw).chars().next().map(|c| c.to_ascii_lowercase())
}
