//! Error types for mailsift.
//!
//! The pure extraction and formatting functions never return these: they
//! degrade to an empty value instead. Errors only cross the boundaries that
//! touch something outside the process (page sources, the reply channel,
//! the clipboard, configuration files).

use thiserror::Error;

/// The main error type for mailsift operations.
#[derive(Debug, Error)]
pub enum MailsiftError {
    /// A user-supplied filter pattern did not compile.
    #[error("Invalid filter pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern source as given.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// The page source could not produce content.
    #[error("Page source error: {0}")]
    Source(String),

    /// The host refused to run the page snippet.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The in-page snippet dropped the reply channel without answering.
    #[error("Reply channel closed before request {request_id} was answered")]
    ChannelClosed {
        /// Correlation id of the unanswered request.
        request_id: String,
    },

    /// The in-page snippet answered a different request.
    #[error("Reply for request {received} does not match pending request {expected}")]
    CorrelationMismatch {
        /// Correlation id that was sent.
        expected: String,
        /// Correlation id that came back.
        received: String,
    },

    /// The page-scripting round trip did not complete in time.
    #[error("Scrape timed out after {seconds:.1}s")]
    Timeout {
        /// Configured timeout in seconds.
        seconds: f64,
    },

    /// A scrape was triggered while another was in flight or cooling down.
    #[error("Scrape rejected: controller is {state}")]
    ScrapeRejected {
        /// State the controller was in.
        state: String,
    },

    /// Clipboard access failed.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MailsiftError {
    /// Creates a source error.
    #[must_use]
    pub fn source_error(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }

    /// Creates a permission error.
    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }

    /// Creates a clipboard error.
    #[must_use]
    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns true if retrying the same operation could succeed.
    ///
    /// Timeouts and clipboard failures are transient; a rejected scrape
    /// clears once the controller returns to idle.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Clipboard(_) | Self::ScrapeRejected { .. }
        )
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, MailsiftError>;
