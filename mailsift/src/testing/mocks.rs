//! Test doubles for the clipboard and the page host.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{MailsiftError, Result};
use crate::export::ClipboardBackend;
use crate::host::PageSource;

#[derive(Debug, Default)]
struct ClipboardState {
    contents: Option<String>,
    writes: usize,
}

/// An in-memory clipboard. Clones share state, so a clone kept by the test
/// observes writes made through the original.
#[derive(Debug, Clone, Default)]
pub struct MockClipboard {
    state: Arc<Mutex<ClipboardState>>,
    fail: bool,
}

impl MockClipboard {
    /// Creates a clipboard that accepts every write.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clipboard that rejects every write.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            state: Arc::default(),
            fail: true,
        }
    }

    /// Last text written.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.state.lock().contents.clone()
    }

    /// Number of write attempts, failed ones included.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }
}

#[async_trait]
impl ClipboardBackend for MockClipboard {
    fn name(&self) -> &str {
        "mock"
    }

    async fn write_text(&self, text: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.writes += 1;
        if self.fail {
            return Err(MailsiftError::clipboard("mock clipboard rejected write"));
        }
        state.contents = Some(text.to_string());
        Ok(())
    }
}

/// A page source that returns fixed markup, optionally after a delay, and
/// counts captures started and finished.
#[derive(Debug, Clone)]
pub struct ScriptedPageSource {
    markup: Arc<Mutex<Option<String>>>,
    delay: Duration,
    captures: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
}

impl ScriptedPageSource {
    /// Creates a source that answers immediately.
    #[must_use]
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: Arc::new(Mutex::new(Some(markup.into()))),
            delay: Duration::ZERO,
            captures: Arc::default(),
            completed: Arc::default(),
        }
    }

    /// Delays every capture.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Replaces the markup returned by later captures.
    pub fn set_markup(&self, markup: Option<&str>) {
        *self.markup.lock() = markup.map(str::to_string);
    }

    /// Number of captures started.
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    /// Number of captures that ran past their delay.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for ScriptedPageSource {
    fn describe(&self) -> String {
        "scripted".to_string()
    }

    async fn capture(&self) -> Result<Option<String>> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(self.markup.lock().clone())
    }
}

/// A page source whose snippet never answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct HangingPageSource;

#[async_trait]
impl PageSource for HangingPageSource {
    fn describe(&self) -> String {
        "hanging".to_string()
    }

    async fn capture(&self) -> Result<Option<String>> {
        std::future::pending().await
    }
}

/// A page source that refuses to run until permission is requested.
#[derive(Debug)]
pub struct PermissionGatedSource {
    markup: String,
    grants: bool,
    granted: AtomicBool,
    requests: AtomicUsize,
}

impl PermissionGatedSource {
    /// Creates a source that grants permission when asked.
    #[must_use]
    pub fn granting(markup: impl Into<String>) -> Self {
        Self::build(markup.into(), true)
    }

    /// Creates a source that never grants permission.
    #[must_use]
    pub fn refusing(markup: impl Into<String>) -> Self {
        Self::build(markup.into(), false)
    }

    fn build(markup: String, grants: bool) -> Self {
        Self {
            markup,
            grants,
            granted: AtomicBool::new(false),
            requests: AtomicUsize::new(0),
        }
    }

    /// Number of permission requests so far.
    #[must_use]
    pub fn permission_requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for PermissionGatedSource {
    fn describe(&self) -> String {
        "gated".to_string()
    }

    async fn capture(&self) -> Result<Option<String>> {
        if self.granted.load(Ordering::SeqCst) {
            Ok(Some(self.markup.clone()))
        } else {
            Err(MailsiftError::permission_denied("scripting not allowed on this page"))
        }
    }

    async fn request_permission(&self) -> Result<bool> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.grants {
            self.granted.store(true, Ordering::SeqCst);
        }
        Ok(self.grants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_clipboard_shares_state() {
        let clipboard = MockClipboard::new();
        let probe = clipboard.clone();
        clipboard.write_text("hello").await.unwrap();
        assert_eq!(probe.contents().as_deref(), Some("hello"));
        assert_eq!(probe.write_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_clipboard_counts_attempts() {
        let clipboard = MockClipboard::failing();
        assert!(clipboard.write_text("x").await.is_err());
        assert_eq!(clipboard.write_count(), 1);
        assert!(clipboard.contents().is_none());
    }

    #[tokio::test]
    async fn test_permission_gate() {
        let source = PermissionGatedSource::granting("<p>a@b.cc</p>");
        assert!(source.capture().await.is_err());
        assert!(source.request_permission().await.unwrap());
        assert_eq!(source.capture().await.unwrap().as_deref(), Some("<p>a@b.cc</p>"));

        let refusing = PermissionGatedSource::refusing("");
        assert!(!refusing.request_permission().await.unwrap());
        assert!(refusing.capture().await.is_err());
    }

    #[tokio::test]
    async fn test_scripted_source() {
        let source = ScriptedPageSource::new("one");
        assert_eq!(source.capture().await.unwrap().as_deref(), Some("one"));
        source.set_markup(None);
        assert!(source.capture().await.unwrap().is_none());
        assert_eq!(source.capture_count(), 2);
        assert_eq!(source.completed_count(), 2);
    }
}
