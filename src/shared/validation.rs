use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for vehicle plate numbers (after normalization to upper case)
    /// 2-15 characters of letters, digits, spaces and hyphens, starting and
    /// ending with a letter or digit
    /// - Valid: "ABC-1234", "MH12 AB 1234", "B1234XYZ"
    /// - Invalid: "-ABC", "ABC-", "A", "ABC_123", "ÄBC"
    pub static ref PLATE_NUMBER_REGEX: Regex =
        Regex::new(r"^[A-Z0-9][A-Z0-9 \-]{0,13}[A-Z0-9]$").unwrap();
}

/// Trim, collapse inner whitespace and upper-case a plate number.
/// Returns `None` for blank input.
pub fn normalize_plate_number(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_regex_valid() {
        assert!(PLATE_NUMBER_REGEX.is_match("ABC-1234"));
        assert!(PLATE_NUMBER_REGEX.is_match("MH12 AB 1234"));
        assert!(PLATE_NUMBER_REGEX.is_match("B1234XYZ"));
        assert!(PLATE_NUMBER_REGEX.is_match("AB"));
    }

    #[test]
    fn test_plate_regex_invalid() {
        assert!(!PLATE_NUMBER_REGEX.is_match("-ABC")); // starts with hyphen
        assert!(!PLATE_NUMBER_REGEX.is_match("ABC-")); // ends with hyphen
        assert!(!PLATE_NUMBER_REGEX.is_match("A")); // too short
        assert!(!PLATE_NUMBER_REGEX.is_match("ABC_123")); // underscore
        assert!(!PLATE_NUMBER_REGEX.is_match("abc-123")); // not normalized
        assert!(!PLATE_NUMBER_REGEX.is_match("ABCDEFGHIJKLMNOP")); // too long
        assert!(!PLATE_NUMBER_REGEX.is_match(""));
    }

    #[test]
    fn test_normalize_plate_number() {
        assert_eq!(
            normalize_plate_number("  mh12   ab 1234 "),
            Some("MH12 AB 1234".to_string())
        );
        assert_eq!(normalize_plate_number("   "), None);
    }
}
