//! Human-facing rendering of an email sequence.

use serde::Serialize;

use super::clipboard::pluralize_emails;

/// Shown when a scrape found nothing.
pub const EMPTY_STATE: &str = "No emails found on this page.";

/// Message payload shape shared with the in-page snippet.
#[derive(Debug, Serialize)]
struct EmailsPayload<'a> {
    emails: &'a [String],
}

/// One line per email, numbered from 1, or the empty-state text.
#[must_use]
pub fn render_list(emails: &[String]) -> String {
    if emails.is_empty() {
        return EMPTY_STATE.to_string();
    }
    let width = emails.len().to_string().len();
    emails
        .iter()
        .enumerate()
        .map(|(i, email)| format!("{:>width$}. {email}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `"Found 3 emails"`.
#[must_use]
pub fn render_summary(count: usize) -> String {
    format!("Found {}", pluralize_emails(count))
}

/// `{"emails": [...]}`, pretty-printed.
pub fn render_json(emails: &[String]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&EmailsPayload { emails })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emails(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_render_list() {
        let out = render_list(&emails(&["a@x.com", "b@y.com"]));
        assert_eq!(out, "1. a@x.com\n2. b@y.com");
    }

    #[test]
    fn test_render_list_aligns_numbers() {
        let many: Vec<String> = (0..10).map(|i| format!("u{i}@x.com")).collect();
        let out = render_list(&many);
        assert!(out.starts_with(" 1. u0@x.com"));
        assert!(out.ends_with("10. u9@x.com"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_list(&[]), EMPTY_STATE);
    }

    #[test]
    fn test_summary() {
        assert_eq!(render_summary(1), "Found 1 email");
        assert_eq!(render_summary(0), "Found 0 emails");
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&emails(&["a@x.com"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!({"emails": ["a@x.com"]}));
    }
}
