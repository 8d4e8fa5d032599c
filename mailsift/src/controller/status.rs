//! Transient status messages with auto-dismiss.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    /// Neutral information.
    Info,
    /// An operation succeeded.
    Success,
    /// An operation failed.
    Error,
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A message shown to the user until `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// Text shown.
    pub text: String,
    /// Severity.
    pub level: StatusLevel,
    /// When the message was posted.
    pub shown_at: DateTime<Utc>,
    /// When the message disappears.
    pub expires_at: DateTime<Utc>,
}

impl StatusMessage {
    /// Returns true if the message is still visible at `now`.
    #[must_use]
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Holds at most one status message. A new post replaces the old one.
#[derive(Debug, Clone)]
pub struct StatusBoard {
    lifetime: chrono::Duration,
    current: Option<StatusMessage>,
}

impl StatusBoard {
    /// Creates an empty board whose messages live for `lifetime`.
    #[must_use]
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime: chrono::Duration::from_std(lifetime).unwrap_or_else(|_| chrono::Duration::days(365)),
            current: None,
        }
    }

    /// Posts a message now.
    pub fn post(&mut self, text: impl Into<String>, level: StatusLevel) -> StatusMessage {
        self.post_at(text, level, Utc::now())
    }

    /// Posts a message as of `now`.
    pub fn post_at(
        &mut self,
        text: impl Into<String>,
        level: StatusLevel,
        now: DateTime<Utc>,
    ) -> StatusMessage {
        let message = StatusMessage {
            text: text.into(),
            level,
            shown_at: now,
            expires_at: now.checked_add_signed(self.lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.current = Some(message.clone());
        message
    }

    /// The visible message at `now`, if any. Expired messages are dropped.
    pub fn current_at(&mut self, now: DateTime<Utc>) -> Option<StatusMessage> {
        if self
            .current
            .as_ref()
            .is_some_and(|message| !message.is_visible_at(now))
        {
            self.current = None;
        }
        self.current.clone()
    }

    /// The visible message right now.
    pub fn current(&mut self) -> Option<StatusMessage> {
        self.current_at(Utc::now())
    }

    /// Clears the board.
    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
