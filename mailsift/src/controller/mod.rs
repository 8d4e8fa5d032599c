//! The scrape controller.
//!
//! [`ScrapeController`] is the UI-side owner of a scrape: it gates triggers
//! through the [`ScrapeState`] tri-state, runs the page script over the
//! reply channel with a deadline, keeps the latest [`EmailSequence`] and
//! drives the clipboard copy. Re-entrant triggers are rejected here, not
//! queued.

mod status;

#[cfg(test)]
mod integration_tests;

pub use status::{StatusBoard, StatusLevel, StatusMessage};

use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::channel::request_channel;
use crate::config::MailsiftConfig;
use crate::core::{EmailSequence, ScrapeState};
use crate::errors::{MailsiftError, Result};
use crate::events::{get_event_sink, EventSink};
use crate::export::{copy_emails_with, render_summary, ClipboardBackend, CopyOutcome, EMPTY_STATE};
use crate::extraction::Extractor;
use crate::host::{inject_script, PageScript, PageSource};
use crate::observability::SpanTimer;

#[derive(Debug)]
struct ControllerState {
    state: ScrapeState,
    cooling_since: Option<Instant>,
    emails: EmailSequence,
    status: StatusBoard,
}

impl ControllerState {
    /// Ends an elapsed cooldown and returns the effective state.
    fn refresh(&mut self, cooldown: std::time::Duration) -> ScrapeState {
        if self.state == ScrapeState::CoolingDown
            && self
                .cooling_since
                .map_or(true, |since| since.elapsed() >= cooldown)
        {
            self.state = ScrapeState::Idle;
            self.cooling_since = None;
        }
        self.state
    }
}

/// Puts the controller back to idle if a scrape future is dropped mid-flight.
struct InFlightGuard<'a> {
    inner: &'a Mutex<ControllerState>,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut inner = self.inner.lock();
            if inner.state == ScrapeState::InFlight {
                inner.state = ScrapeState::Idle;
            }
        }
    }
}

/// The spawned page script, aborted on drop.
struct ScriptTask(JoinHandle<Result<()>>);

impl Drop for ScriptTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Drives scrapes against one page source and copies results.
pub struct ScrapeController {
    source: Arc<dyn PageSource>,
    clipboard: Box<dyn ClipboardBackend>,
    config: MailsiftConfig,
    sink: Arc<dyn EventSink>,
    inner: Mutex<ControllerState>,
}

impl std::fmt::Debug for ScrapeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrapeController")
            .field("source", &self.source.describe())
            .field("clipboard", &self.clipboard.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ScrapeController {
    /// Creates a controller. Fails if `config` does not validate.
    ///
    /// Events go to the process-wide sink unless [`with_sink`](Self::with_sink)
    /// overrides it.
    pub fn new(
        source: Arc<dyn PageSource>,
        clipboard: Box<dyn ClipboardBackend>,
        config: MailsiftConfig,
    ) -> Result<Self> {
        config.validate()?;
        let status = StatusBoard::new(config.status_dismiss());
        Ok(Self {
            source,
            clipboard,
            config,
            sink: get_event_sink(),
            inner: Mutex::new(ControllerState {
                state: ScrapeState::Idle,
                cooling_since: None,
                emails: EmailSequence::new(),
                status,
            }),
        })
    }

    /// Routes events to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &MailsiftConfig {
        &self.config
    }

    /// Current lifecycle state. An elapsed cooldown reads as idle.
    pub fn state(&self) -> ScrapeState {
        self.inner.lock().refresh(self.config.cooldown())
    }

    /// Label for the scrape trigger.
    pub fn trigger_label(&self) -> &'static str {
        self.state().button_label()
    }

    /// Emails from the last successful scrape.
    pub fn emails(&self) -> EmailSequence {
        self.inner.lock().emails.clone()
    }

    /// The visible status message, if any.
    pub fn status(&self) -> Option<StatusMessage> {
        self.inner.lock().status.current()
    }

    /// Hides the status message.
    pub fn dismiss_status(&self) {
        self.inner.lock().status.dismiss();
    }

    /// Runs one scrape.
    ///
    /// On success the held emails are replaced wholesale and the trigger
    /// cools down. On failure the previous emails stay and the controller
    /// returns to idle. A trigger while in flight or cooling down fails with
    /// [`MailsiftError::ScrapeRejected`].
    pub async fn scrape(&self) -> Result<EmailSequence> {
        {
            let mut inner = self.inner.lock();
            let state = inner.refresh(self.config.cooldown());
            if !state.accepts_trigger() {
                drop(inner);
                self.sink.try_emit(
                    "scrape.rejected",
                    Some(json!({ "state": state.to_string() })),
                );
                return Err(MailsiftError::ScrapeRejected {
                    state: state.to_string(),
                });
            }
            inner.state = ScrapeState::InFlight;
        }
        let guard = InFlightGuard {
            inner: &self.inner,
            armed: true,
        };

        self.sink.try_emit(
            "scrape.started",
            Some(json!({ "source": self.source.describe() })),
        );
        let timer = SpanTimer::start("scrape");
        let result = self.round_trip().await;
        let duration_ms = timer.finish();
        guard.disarm();

        match result {
            Ok(emails) => {
                let count = emails.len();
                {
                    let mut inner = self.inner.lock();
                    inner.emails = emails.clone();
                    inner.state = ScrapeState::CoolingDown;
                    inner.cooling_since = Some(Instant::now());
                    let text = if count == 0 {
                        EMPTY_STATE.to_string()
                    } else {
                        render_summary(count)
                    };
                    inner.status.post(text, StatusLevel::Info);
                }
                tracing::info!(count, duration_ms, "Scrape completed");
                self.sink
                    .emit(
                        "scrape.completed",
                        Some(json!({ "count": count, "duration_ms": duration_ms })),
                    )
                    .await;
                Ok(emails)
            }
            Err(err) => {
                {
                    let mut inner = self.inner.lock();
                    inner.state = ScrapeState::Idle;
                    inner.status.post(err.to_string(), StatusLevel::Error);
                }
                let event = if matches!(err, MailsiftError::Timeout { .. }) {
                    "scrape.timed_out"
                } else {
                    "scrape.failed"
                };
                tracing::warn!(error = %err, duration_ms, "Scrape failed");
                self.sink
                    .emit(
                        event,
                        Some(json!({
                            "error": err.to_string(),
                            "retryable": err.is_retryable(),
                            "duration_ms": duration_ms,
                        })),
                    )
                    .await;
                Err(err)
            }
        }
    }

    /// Copies the held emails to the clipboard and posts the outcome.
    pub async fn copy(&self) -> CopyOutcome {
        let emails = self.emails();
        let outcome =
            copy_emails_with(self.clipboard.as_ref(), emails.as_slice(), &self.config.clipboard)
                .await;

        let level = if outcome.success {
            StatusLevel::Success
        } else {
            StatusLevel::Error
        };
        self.inner.lock().status.post(outcome.message.clone(), level);

        let event = if outcome.success {
            "clipboard.copied"
        } else {
            "clipboard.failed"
        };
        self.sink
            .emit(
                event,
                Some(json!({
                    "count": outcome.count,
                    "message": outcome.message,
                    "backend": self.clipboard.name(),
                })),
            )
            .await;
        outcome
    }

    /// One attempt, plus a single retry after the host grants permission.
    async fn round_trip(&self) -> Result<EmailSequence> {
        match self.attempt().await {
            Err(MailsiftError::PermissionDenied(reason)) => {
                tracing::info!(%reason, "Requesting scripting permission");
                if self.source.request_permission().await? {
                    self.attempt().await
                } else {
                    Err(MailsiftError::PermissionDenied(reason))
                }
            }
            other => other,
        }
    }

    async fn attempt(&self) -> Result<EmailSequence> {
        let (request, reply, pending) = request_channel(self.config.scraping.clone());
        let request_id = request.request_id;
        let script = PageScript::new(Extractor::new().with_sink(Arc::clone(&self.sink)));
        let mut task = ScriptTask(inject_script(
            Arc::clone(&self.source),
            script,
            request,
            reply,
        ));

        match pending.wait(self.config.scrape_timeout()).await {
            Ok(emails) => Ok(emails),
            // The snippet gave up without answering; its task holds the reason.
            Err(MailsiftError::ChannelClosed { .. }) => match (&mut task.0).await {
                Ok(Err(err)) => Err(err),
                Ok(Ok(())) => Err(MailsiftError::ChannelClosed {
                    request_id: request_id.to_string(),
                }),
                Err(join) => Err(MailsiftError::source_error(format!(
                    "page script aborted: {join}"
                ))),
            },
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fast_config, MockClipboard, ScriptedPageSource};

    fn controller(markup: &str) -> ScrapeController {
        ScrapeController::new(
            Arc::new(ScriptedPageSource::new(markup)),
            Box::new(MockClipboard::new()),
            fast_config(),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let err = ScrapeController::new(
            Arc::new(ScriptedPageSource::new("")),
            Box::new(MockClipboard::new()),
            MailsiftConfig::default().with_scrape_timeout(0.0),
        )
        .unwrap_err();
        assert!(matches!(err, MailsiftError::Config(_)));
    }

    #[test]
    fn test_starts_idle() {
        let controller = controller("");
        assert_eq!(controller.state(), ScrapeState::Idle);
        assert_eq!(controller.trigger_label(), "Scrape Emails");
        assert!(controller.emails().is_empty());
        assert!(controller.status().is_none());
    }

    #[tokio::test]
    async fn test_scrape_posts_summary() {
        let controller = controller("<p>a@b.cc</p>");
        let emails = controller.scrape().await.unwrap();
        assert_eq!(emails.as_slice(), &["a@b.cc"]);
        assert_eq!(controller.status().unwrap().text, "Found 1 email");
    }

    #[tokio::test]
    async fn test_empty_page_posts_empty_state() {
        let controller = controller("<p>nothing here</p>");
        assert!(controller.scrape().await.unwrap().is_empty());
        assert_eq!(controller.status().unwrap().text, EMPTY_STATE);
    }

    #[tokio::test]
    async fn test_dropped_scrape_returns_to_idle() {
        let controller = ScrapeController::new(
            Arc::new(crate::testing::HangingPageSource),
            Box::new(MockClipboard::new()),
            MailsiftConfig::default(),
        )
        .unwrap();
        let scrape = controller.scrape();
        let _ = tokio::time::timeout(std::time::Duration::from_millis(20), scrape).await;
        assert_eq!(controller.state(), ScrapeState::Idle);
    }

    #[tokio::test]
    async fn test_dropped_scrape_aborts_capture() {
        let source = ScriptedPageSource::new("<p>a@b.cc</p>")
            .with_delay(std::time::Duration::from_millis(100));
        let controller = ScrapeController::new(
            Arc::new(source.clone()),
            Box::new(MockClipboard::new()),
            MailsiftConfig::default(),
        )
        .unwrap();

        let scrape = controller.scrape();
        assert!(tokio::time::timeout(std::time::Duration::from_millis(20), scrape)
            .await
            .is_err());
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        assert_eq!(source.capture_count(), 1);
        assert_eq!(source.completed_count(), 0);
        assert_eq!(controller.state(), ScrapeState::Idle);
    }

    #[tokio::test]
    async fn test_timed_out_scrape_aborts_capture() {
        let source = ScriptedPageSource::new("<p>a@b.cc</p>")
            .with_delay(std::time::Duration::from_millis(300));
        let controller = ScrapeController::new(
            Arc::new(source.clone()),
            Box::new(MockClipboard::new()),
            fast_config(),
        )
        .unwrap();

        let err = controller.scrape().await.unwrap_err();
        assert!(matches!(err, MailsiftError::Timeout { .. }));
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        assert_eq!(source.completed_count(), 0);
    }
}
