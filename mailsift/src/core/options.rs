//! Option structs passed explicitly to the extractor and exporter.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::errors::{MailsiftError, Result};

/// A compiled user-supplied pattern that extracted emails must also match.
///
/// Serializes as its source string.
#[derive(Clone)]
pub struct FilterPattern {
    regex: Regex,
}

impl FilterPattern {
    /// Compiles a filter pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(|regex| Self { regex })
            .map_err(|e| MailsiftError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Returns true if the email matches the pattern anywhere.
    #[must_use]
    pub fn is_match(&self, email: &str) -> bool {
        self.regex.is_match(email)
    }

    /// Returns the pattern source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl fmt::Debug for FilterPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FilterPattern").field(&self.as_str()).finish()
    }
}

impl PartialEq for FilterPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for FilterPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FilterPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Self::new(&source).map_err(serde::de::Error::custom)
    }
}

/// Options for a single extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapingOptions {
    /// Keep repeated addresses instead of suppressing them.
    #[serde(default)]
    pub include_duplicates: bool,
    /// Keep only addresses that also match this pattern.
    #[serde(default)]
    pub filter_pattern: Option<FilterPattern>,
}

impl ScrapingOptions {
    /// Creates options with defaults (dedupe on, no filter).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps or suppresses duplicates.
    #[must_use]
    pub fn with_duplicates(mut self, include: bool) -> Self {
        self.include_duplicates = include;
        self
    }

    /// Sets an already compiled filter.
    #[must_use]
    pub fn with_filter(mut self, filter: FilterPattern) -> Self {
        self.filter_pattern = Some(filter);
        self
    }

    /// Compiles and sets a filter pattern.
    pub fn with_filter_pattern(self, pattern: &str) -> Result<Self> {
        Ok(self.with_filter(FilterPattern::new(pattern)?))
    }
}

fn default_separator() -> String {
    ",".to_string()
}

/// Options for the clipboard payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardOptions {
    /// Joins the emails.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Prepend an `Emails found (N):` line.
    #[serde(default)]
    pub include_headers: bool,
}

impl Default for ClipboardOptions {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            include_headers: false,
        }
    }
}

impl ClipboardOptions {
    /// Creates options with defaults (comma separator, no header).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the separator.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Enables or disables the count header.
    #[must_use]
    pub fn with_headers(mut self, include: bool) -> Self {
        self.include_headers = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scraping_defaults() {
        let opts = ScrapingOptions::default();
        assert!(!opts.include_duplicates);
        assert!(opts.filter_pattern.is_none());
    }

    #[test]
    fn test_clipboard_defaults() {
        let opts = ClipboardOptions::default();
        assert_eq!(opts.separator, ",");
        assert!(!opts.include_headers);
    }

    #[test]
    fn test_invalid_filter_pattern() {
        let err = ScrapingOptions::new().with_filter_pattern("([").unwrap_err();
        assert!(matches!(err, MailsiftError::InvalidPattern { .. }));
    }

    #[test]
    fn test_filter_pattern_serde() {
        let opts = ScrapingOptions::new()
            .with_filter_pattern(r"@example\.com$")
            .unwrap();
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["filter_pattern"], serde_json::json!(r"@example\.com$"));

        let back: ScrapingOptions = serde_json::from_value(json).unwrap();
        assert_eq!(back, opts);
    }

    #[test]
    fn test_bad_pattern_rejected_on_deserialize() {
        let result: std::result::Result<ScrapingOptions, _> =
            serde_json::from_str(r#"{"filter_pattern": "(["}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_clipboard_options_partial_json() {
        let opts: ClipboardOptions = serde_json::from_str(r#"{"include_headers": true}"#).unwrap();
        assert_eq!(opts.separator, ",");
        assert!(opts.include_headers);
    }
}
