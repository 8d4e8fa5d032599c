//! Event sink trait and implementations.

use async_trait::async_trait;
use tracing::{debug, info, warn, Level};

/// Receives pipeline events (`scrape.started`, `extraction.failed`, ...).
///
/// Sinks are the observability boundary: faults swallowed by the pure
/// functions are reported here instead of being raised.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Emits an event asynchronously.
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>);

    /// Emits an event without blocking. Must never panic.
    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>);
}

/// Discards all events. Used when no sink is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event_type: &str, _data: Option<serde_json::Value>) {}

    fn try_emit(&self, _event_type: &str, _data: Option<serde_json::Value>) {}
}

/// Forwards events to `tracing`.
///
/// Events whose type ends in `.failed`, `.rejected` or `.timed_out` are
/// logged at WARN regardless of the configured level.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a logging sink with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn is_problem(event_type: &str) -> bool {
        [".failed", ".rejected", ".timed_out"]
            .iter()
            .any(|suffix| event_type.ends_with(suffix))
    }

    fn log_event(&self, event_type: &str, data: &Option<serde_json::Value>) {
        if Self::is_problem(event_type) {
            warn!(event_type = %event_type, event_data = ?data, "Event: {}", event_type);
            return;
        }
        if self.level == Level::DEBUG {
            debug!(event_type = %event_type, event_data = ?data, "Event: {}", event_type);
        } else {
            info!(event_type = %event_type, event_data = ?data, "Event: {}", event_type);
        }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.log_event(event_type, &data);
    }

    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.log_event(event_type, &data);
    }
}

/// Records events in memory, for tests.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: parking_lot::RwLock<Vec<(String, Option<serde_json::Value>)>>,
}

impl CollectingEventSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<(String, Option<serde_json::Value>)> {
        self.events.read().clone()
    }

    /// Returns the collected event types in order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.events.read().iter().map(|(t, _)| t.clone()).collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Returns events matching a type prefix.
    #[must_use]
    pub fn events_of_type(&self, type_prefix: &str) -> Vec<(String, Option<serde_json::Value>)> {
        self.events
            .read()
            .iter()
            .filter(|(t, _)| t.starts_with(type_prefix))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.events.write().push((event_type.to_string(), data));
    }

    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        self.events.write().push((event_type.to_string(), data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_sink() {
        let sink = NoOpEventSink;
        sink.emit("scrape.started", None).await;
        sink.try_emit("scrape.completed", Some(serde_json::json!({"count": 1})));
    }

    #[test]
    fn test_problem_events() {
        assert!(LoggingEventSink::is_problem("extraction.failed"));
        assert!(LoggingEventSink::is_problem("scrape.timed_out"));
        assert!(!LoggingEventSink::is_problem("scrape.completed"));
    }

    #[tokio::test]
    async fn test_collecting_sink_filter() {
        let sink = CollectingEventSink::new();
        sink.emit("scrape.started", None).await;
        sink.try_emit("scrape.completed", Some(serde_json::json!({"count": 2})));
        sink.try_emit("clipboard.copied", None);

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.events_of_type("scrape.").len(), 2);
        assert_eq!(
            sink.event_types(),
            vec!["scrape.started", "scrape.completed", "clipboard.copied"]
        );
    }
}
