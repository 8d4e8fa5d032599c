//! Runtime configuration.
//!
//! Everything here is passed explicitly to the controller; there is no
//! global configuration state. Files are JSON and every field is optional.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::core::{ClipboardOptions, ScrapingOptions};
use crate::errors::{MailsiftError, Result};

fn default_scrape_timeout() -> f64 {
    10.0
}

fn default_status_dismiss() -> f64 {
    3.0
}

fn default_cooldown_ms() -> u64 {
    500
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailsiftConfig {
    /// Extraction options.
    #[serde(default)]
    pub scraping: ScrapingOptions,
    /// Clipboard payload options.
    #[serde(default)]
    pub clipboard: ClipboardOptions,
    /// Deadline for the page-scripting round trip.
    #[serde(default = "default_scrape_timeout")]
    pub scrape_timeout_seconds: f64,
    /// How long status messages stay visible.
    #[serde(default = "default_status_dismiss")]
    pub status_dismiss_seconds: f64,
    /// How long the trigger stays disabled after a scrape completes.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

impl Default for MailsiftConfig {
    fn default() -> Self {
        Self {
            scraping: ScrapingOptions::default(),
            clipboard: ClipboardOptions::default(),
            scrape_timeout_seconds: default_scrape_timeout(),
            status_dismiss_seconds: default_status_dismiss(),
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

impl MailsiftConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Rejects non-positive or non-finite durations.
    pub fn validate(&self) -> Result<()> {
        if !(self.scrape_timeout_seconds.is_finite() && self.scrape_timeout_seconds > 0.0) {
            return Err(MailsiftError::config(format!(
                "scrape_timeout_seconds must be positive, got {}",
                self.scrape_timeout_seconds
            )));
        }
        if !(self.status_dismiss_seconds.is_finite() && self.status_dismiss_seconds > 0.0) {
            return Err(MailsiftError::config(format!(
                "status_dismiss_seconds must be positive, got {}",
                self.status_dismiss_seconds
            )));
        }
        Ok(())
    }

    /// Sets the scrape timeout.
    #[must_use]
    pub fn with_scrape_timeout(mut self, seconds: f64) -> Self {
        self.scrape_timeout_seconds = seconds;
        self
    }

    /// Sets the cooldown.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown_ms = u64::try_from(cooldown.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the extraction options.
    #[must_use]
    pub fn with_scraping(mut self, scraping: ScrapingOptions) -> Self {
        self.scraping = scraping;
        self
    }

    /// Sets the clipboard options.
    #[must_use]
    pub fn with_clipboard(mut self, clipboard: ClipboardOptions) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Scrape timeout as a `Duration`. Call [`validate`](Self::validate) first.
    #[must_use]
    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.scrape_timeout_seconds)
    }

    /// Status lifetime as a `Duration`.
    #[must_use]
    pub fn status_dismiss(&self) -> Duration {
        Duration::from_secs_f64(self.status_dismiss_seconds)
    }

    /// Cooldown as a `Duration`.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = MailsiftConfig::default();
        assert_eq!(config.scrape_timeout(), Duration::from_secs(10));
        assert_eq!(config.status_dismiss(), Duration::from_secs(3));
        assert_eq!(config.cooldown(), Duration::from_millis(500));
        assert_eq!(config.clipboard.separator, ",");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(MailsiftConfig::from_json_str("{}").unwrap(), MailsiftConfig::default());
    }

    #[test]
    fn test_nested_json() {
        let config = MailsiftConfig::from_json_str(
            r#"{
                "scraping": {"include_duplicates": true, "filter_pattern": "@corp\\.io$"},
                "clipboard": {"separator": "\n", "include_headers": true},
                "scrape_timeout_seconds": 2.5
            }"#,
        )
        .unwrap();
        assert!(config.scraping.include_duplicates);
        assert_eq!(config.scraping.filter_pattern.as_ref().unwrap().as_str(), r"@corp\.io$");
        assert_eq!(config.clipboard.separator, "\n");
        assert_eq!(config.scrape_timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn test_rejects_bad_timeout() {
        let err = MailsiftConfig::from_json_str(r#"{"scrape_timeout_seconds": 0}"#).unwrap_err();
        assert!(matches!(err, MailsiftError::Config(_)));
        assert!(MailsiftConfig::default().with_scrape_timeout(-1.0).validate().is_err());
    }

    #[test]
    fn test_rejects_bad_filter() {
        let err = MailsiftConfig::from_json_str(r#"{"scraping": {"filter_pattern": "(["}}"#)
            .unwrap_err();
        assert!(matches!(err, MailsiftError::Serialization(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cooldown_ms": 0}}"#).unwrap();
        let config = MailsiftConfig::from_file(file.path()).unwrap();
        assert_eq!(config.cooldown(), Duration::ZERO);
    }
}
