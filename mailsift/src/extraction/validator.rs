//! Standalone email validation.

use super::patterns::STRICT_EMAIL;

/// Returns true if `email` satisfies the strict grammar.
///
/// The grammar is matched against the string exactly as given, after
/// trimming: callers are expected to lower-case first (see
/// [`normalize_email`]). Mixed-case input is rejected.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    STRICT_EMAIL.is_match(email.trim())
}

/// Trims and lower-cases a candidate.
///
/// Returns `None` for blank input.
#[must_use]
pub fn normalize_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for email in [
            "a@x.co",
            "first.last@example.com",
            "user+tag@mail.example.org",
            "odd_%name-1@host-2.io",
            "bob@sub.example.co.uk",
            "  padded@example.com  ",
        ] {
            assert!(is_valid_email(email), "{email} should be valid");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "not-an-email",
            "@example.com",
            "user@",
            "user@localhost",
            "user@example.c",
            "user@example.c0m",
            "user@exa_mple.com",
            "a@b@example.com",
            "user name@example.com",
            "jos\u{e9}@example.com",
            "user@example.com.",
        ] {
            assert!(!is_valid_email(email), "{email} should be invalid");
        }
    }

    #[test]
    fn test_mixed_case_rejected_by_direct_use() {
        assert!(!is_valid_email("Jane@Example.com"));
        assert!(is_valid_email(&normalize_email("Jane@Example.com").unwrap()));
    }

    #[test]
    fn test_generated_local_parts_valid() {
        let allowed = "abcdefghijklmnopqrstuvwxyz0123456789._%+-";
        for (i, c) in allowed.chars().enumerate() {
            let local: String = std::iter::repeat(c).take(i % 3 + 1).collect();
            for tld in ["io", "com", "museum"] {
                let email = format!("{local}@domain.{tld}");
                assert!(is_valid_email(&email), "{email} should be valid");
            }
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_email("  Ada@Example.com ").as_deref(), Some("ada@example.com"));
        assert_eq!(normalize_email("   "), None);
    }
}
