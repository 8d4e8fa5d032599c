//! Clipboard payload formatting.
//!
//! This stage runs its own exact-literal deduplication. It is independent of
//! the extractor's case-insensitive pass: here "duplicate" means two
//! identical strings, so `A@x.com` and `a@x.com` both survive if a caller
//! hands both in. Do not fold the two passes together.

use std::collections::HashSet;

use crate::core::ClipboardOptions;
use crate::observability::guarded;

/// Keeps the first occurrence of each exact string, in order.
#[must_use]
pub fn unique_literals<S: AsRef<str>>(emails: &[S]) -> Vec<&str> {
    let mut seen = HashSet::new();
    emails
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|email| seen.insert(*email))
        .collect()
}

/// Header line stating how many emails follow.
#[must_use]
pub fn header_line(count: usize) -> String {
    format!("Emails found ({count}):")
}

/// Builds the clipboard payload.
///
/// Empty input yields an empty string, even with headers enabled.
#[must_use]
pub fn format_for_clipboard<S: AsRef<str>>(emails: &[S], options: &ClipboardOptions) -> String {
    guarded("formatting", String::new(), || {
        let unique = unique_literals(emails);
        if unique.is_empty() {
            return String::new();
        }

        let body = unique.join(options.separator.as_str());
        if options.include_headers {
            format!("{}\n{body}", header_line(unique.len()))
        } else {
            body
        }
    })
}

/// [`format_for_clipboard`] over untyped input.
///
/// Non-array input yields an empty string; non-string entries are skipped.
#[must_use]
pub fn format_value_for_clipboard(value: &serde_json::Value, options: &ClipboardOptions) -> String {
    let emails: Vec<&str> = value
        .as_array()
        .map(|items| items.iter().filter_map(serde_json::Value::as_str).collect())
        .unwrap_or_default();
    format_for_clipboard(&emails, options)
}
