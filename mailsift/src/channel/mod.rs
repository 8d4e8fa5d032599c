//! One-shot request/response channel between the UI side and the in-page
//! snippet.
//!
//! Each scrape creates a fresh channel carrying a correlation id. The UI
//! side waits for exactly one reply with a timeout; a reply for a different
//! id, a dropped sender, or silence past the deadline are all reported as
//! errors instead of hanging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::core::{EmailSequence, ScrapingOptions};
use crate::errors::{MailsiftError, Result};

/// What the UI asks the in-page snippet to do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeRequest {
    /// Correlation id echoed in the reply.
    pub request_id: Uuid,
    /// Options for the extractor.
    pub options: ScrapingOptions,
    /// When the request was created.
    pub issued_at: DateTime<Utc>,
}

impl ScrapeRequest {
    /// Creates a request with a fresh id.
    #[must_use]
    pub fn new(options: ScrapingOptions) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            options,
            issued_at: Utc::now(),
        }
    }
}

/// The snippet's answer. The payload is a single `emails` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeReply {
    /// Id of the request being answered.
    pub request_id: Uuid,
    /// Extracted emails.
    #[serde(default)]
    pub emails: EmailSequence,
}

impl ScrapeReply {
    /// Creates a reply.
    #[must_use]
    pub fn new(request_id: Uuid, emails: EmailSequence) -> Self {
        Self { request_id, emails }
    }

    /// Decodes a loosely shaped message.
    ///
    /// A missing or malformed `emails` field decodes as an empty sequence.
    /// A missing or unparsable `request_id` falls back to `default_id`.
    #[must_use]
    pub fn from_message(message: &serde_json::Value, default_id: Uuid) -> Self {
        let request_id = message
            .get("request_id")
            .and_then(serde_json::Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or(default_id);
        let emails = message
            .get("emails")
            .map(EmailSequence::from_value)
            .unwrap_or_default();
        Self { request_id, emails }
    }
}

/// Snippet-side end of the channel. Consumed by the single reply.
#[derive(Debug)]
pub struct ReplyHandle {
    request_id: Uuid,
    sender: oneshot::Sender<ScrapeReply>,
}

impl ReplyHandle {
    /// Id of the request this handle answers.
    #[must_use]
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Sends the reply. Returns false if the UI side stopped waiting.
    pub fn reply(self, emails: EmailSequence) -> bool {
        let reply = ScrapeReply::new(self.request_id, emails);
        self.send(reply)
    }

    /// Sends a raw message, decoded leniently.
    pub fn reply_message(self, message: &serde_json::Value) -> bool {
        let reply = ScrapeReply::from_message(message, self.request_id);
        self.send(reply)
    }

    /// Sends an already built reply.
    pub fn send(self, reply: ScrapeReply) -> bool {
        self.sender.send(reply).is_ok()
    }
}

/// UI-side end of the channel.
#[derive(Debug)]
pub struct PendingReply {
    request_id: Uuid,
    receiver: oneshot::Receiver<ScrapeReply>,
}

impl PendingReply {
    /// Id of the outstanding request.
    #[must_use]
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Waits for the reply.
    pub async fn wait(self, timeout: Duration) -> Result<EmailSequence> {
        let expected = self.request_id;
        match tokio::time::timeout(timeout, self.receiver).await {
            Ok(Ok(reply)) if reply.request_id == expected => Ok(reply.emails),
            Ok(Ok(reply)) => Err(MailsiftError::CorrelationMismatch {
                expected: expected.to_string(),
                received: reply.request_id.to_string(),
            }),
            Ok(Err(_)) => Err(MailsiftError::ChannelClosed {
                request_id: expected.to_string(),
            }),
            Err(_) => Err(MailsiftError::Timeout {
                seconds: timeout.as_secs_f64(),
            }),
        }
    }
}

/// Opens a channel for one scrape.
#[must_use]
pub fn request_channel(options: ScrapingOptions) -> (ScrapeRequest, ReplyHandle, PendingReply) {
    let request = ScrapeRequest::new(options);
    let (sender, receiver) = oneshot::channel();
    let handle = ReplyHandle {
        request_id: request.request_id,
        sender,
    };
    let pending = PendingReply {
        request_id: request.request_id,
        receiver,
    };
    (request, handle, pending)
}
