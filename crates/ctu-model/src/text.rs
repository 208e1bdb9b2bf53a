/// Normalize a lookup key: trimmed, lowercased.
///
/// Applied to both sides of every resource-table join so matching is exact
/// over the normalized form.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_key;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_key("  EGFR "), "egfr");
        assert_eq!(normalize_key("Non-Small Cell"), "non-small cell");
        assert_eq!(normalize_key("   "), "");
    }
}
