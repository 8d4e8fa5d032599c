//! The ordered result of one extraction run.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Ordered emails produced by the extractor.
///
/// First-occurrence order is preserved. A new scrape replaces the whole
/// sequence; sequences are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailSequence {
    emails: Vec<String>,
}

impl EmailSequence {
    /// Creates an empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the emails as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.emails
    }

    /// Consumes the sequence.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.emails
    }

    /// Builds a sequence from a JSON value, keeping only string entries.
    ///
    /// Anything other than an array yields an empty sequence.
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Self {
        value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(serde_json::Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Deref for EmailSequence {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.emails
    }
}

impl From<Vec<String>> for EmailSequence {
    fn from(emails: Vec<String>) -> Self {
        Self { emails }
    }
}

impl FromIterator<String> for EmailSequence {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            emails: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for EmailSequence {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.emails.into_iter()
    }
}

impl<'a> IntoIterator for &'a EmailSequence {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.emails.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_array() {
        let seq = EmailSequence::from(vec!["a@x.com".to_string()]);
        assert_eq!(serde_json::to_value(&seq).unwrap(), serde_json::json!(["a@x.com"]));
    }

    #[test]
    fn test_from_value_skips_non_strings() {
        let value = serde_json::json!(["a@x.com", 3, null, "b@y.com"]);
        let seq = EmailSequence::from_value(&value);
        assert_eq!(seq.as_slice(), &["a@x.com".to_string(), "b@y.com".to_string()]);
    }

    #[test]
    fn test_from_value_non_array() {
        assert!(EmailSequence::from_value(&serde_json::json!({"emails": 1})).is_empty());
        assert!(EmailSequence::from_value(&serde_json::Value::Null).is_empty());
    }
}
