//! Reusable field filters
//!
//! These filters normalize text fields before they are persisted

/// Filter: trim surrounding whitespace
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Filter: trim an optional field, collapsing blank text to `None`
pub fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_removes_whitespace() {
        assert_eq!(trim("  Books \n"), "Books");
        assert_eq!(trim("Books"), "Books");
    }

    #[test]
    fn test_trim_optional_collapses_blank() {
        assert_eq!(trim_optional(None), None);
        assert_eq!(trim_optional(Some("   ".to_string())), None);
        assert_eq!(trim_optional(Some("".to_string())), None);
        assert_eq!(
            trim_optional(Some("  12 Main St ".to_string())),
            Some("12 Main St".to_string())
        );
    }
}
