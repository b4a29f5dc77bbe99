//! Pattern and extension validation.
//!
//! Both checks are pure and short-circuit on the first failure, in the
//! order documented on each function.

use crate::error::DomainScoutError;
use regex::Regex;

lazy_static::lazy_static! {
    static ref EXTENSION_RE: Regex = Regex::new(r"^\.[a-z0-9]+$").expect("valid extension regex");
}

/// Validate a pattern string before it is parsed for sizing or generation.
///
/// Checks, in order:
/// 1. empty string
/// 2. contains a space
/// 3. starts with `-`
/// 4. ends with `-`
/// 5. contains `--`
/// 6. contains a character outside ASCII letters, digits, `-` and `_`
pub fn validate_pattern(pattern: &str) -> Result<(), DomainScoutError> {
    if pattern.is_empty() {
        return Err(DomainScoutError::EmptyPattern);
    }
    if pattern.contains(' ') {
        return Err(DomainScoutError::ContainsSpace);
    }
    if pattern.starts_with('-') {
        return Err(DomainScoutError::LeadingHyphen);
    }
    if pattern.ends_with('-') {
        return Err(DomainScoutError::TrailingHyphen);
    }
    if pattern.contains("--") {
        return Err(DomainScoutError::ConsecutiveHyphens);
    }
    if let Some(bad) = pattern.chars().find(|c| !is_pattern_char(*c)) {
        return Err(DomainScoutError::InvalidCharacter(bad));
    }
    Ok(())
}

fn is_pattern_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Validate an extension list such as `[".com", ".net"]`.
///
/// Checks, in order: the list is non-empty, then for each element in turn
/// that it starts with `.`, is at least two characters long, and matches
/// `^\.[a-z0-9]+$`.
pub fn validate_extensions<S: AsRef<str>>(extensions: &[S]) -> Result<(), DomainScoutError> {
    if extensions.is_empty() {
        return Err(DomainScoutError::NoExtensions);
    }

    for ext in extensions {
        let ext = ext.as_ref();
        if !ext.starts_with('.') {
            return Err(DomainScoutError::MissingDot(ext.to_string()));
        }
        if ext.len() < 2 {
            return Err(DomainScoutError::TooShort(ext.to_string()));
        }
        if !EXTENSION_RE.is_match(ext) {
            return Err(DomainScoutError::InvalidExtensionFormat(ext.to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_patterns() {
        assert_eq!(validate_pattern("test"), Ok(()));
        assert_eq!(validate_pattern("ccvv"), Ok(()));
        assert_eq!(validate_pattern("go-_n"), Ok(()));
        assert_eq!(validate_pattern("APP2"), Ok(()));
    }

    #[test]
    fn test_empty_pattern() {
        assert_eq!(validate_pattern(""), Err(DomainScoutError::EmptyPattern));
    }

    #[test]
    fn test_hyphen_rules() {
        assert_eq!(validate_pattern("-test"), Err(DomainScoutError::LeadingHyphen));
        assert_eq!(validate_pattern("test-"), Err(DomainScoutError::TrailingHyphen));
        assert_eq!(
            validate_pattern("te--st"),
            Err(DomainScoutError::ConsecutiveHyphens)
        );
    }

    #[test]
    fn test_space_checked_before_hyphens() {
        assert_eq!(validate_pattern("-a b"), Err(DomainScoutError::ContainsSpace));
    }

    #[test]
    fn test_leading_checked_before_trailing() {
        assert_eq!(validate_pattern("-ab-"), Err(DomainScoutError::LeadingHyphen));
    }

    #[test]
    fn test_invalid_character_reports_first_offender() {
        assert_eq!(
            validate_pattern("ab.c!"),
            Err(DomainScoutError::InvalidCharacter('.'))
        );
        assert_eq!(
            validate_pattern("caf\u{e9}"),
            Err(DomainScoutError::InvalidCharacter('\u{e9}'))
        );
    }

    #[test]
    fn test_valid_extensions() {
        assert_eq!(validate_extensions(&[".com"]), Ok(()));
        assert_eq!(validate_extensions(&[".com", ".io", ".co2"]), Ok(()));
    }

    #[test]
    fn test_no_extensions() {
        let empty: [&str; 0] = [];
        assert_eq!(validate_extensions(&empty), Err(DomainScoutError::NoExtensions));
    }

    #[test]
    fn test_extension_errors() {
        assert_eq!(
            validate_extensions(&["com"]),
            Err(DomainScoutError::MissingDot("com".to_string()))
        );
        assert_eq!(
            validate_extensions(&["."]),
            Err(DomainScoutError::TooShort(".".to_string()))
        );
        assert_eq!(
            validate_extensions(&[".COM"]),
            Err(DomainScoutError::InvalidExtensionFormat(".COM".to_string()))
        );
        assert_eq!(
            validate_extensions(&[".co.uk"]),
            Err(DomainScoutError::InvalidExtensionFormat(".co.uk".to_string()))
        );
    }

    #[test]
    fn test_extension_errors_stop_at_first_bad_element() {
        assert_eq!(
            validate_extensions(&[".com", "net", "."]),
            Err(DomainScoutError::MissingDot("net".to_string()))
        );
    }

    #[test]
    fn test_extensions_accept_owned_strings() {
        let exts = vec![".com".to_string(), ".net".to_string()];
        assert!(validate_extensions(&exts).is_ok());
    }
}
