//! End-to-end tests for the scrape and copy workflow.

#[cfg(test)]
mod tests {
    use crate::config::MailsiftConfig;
    use crate::controller::{ScrapeController, StatusLevel};
    use crate::core::{ClipboardOptions, ScrapeState, ScrapingOptions};
    use crate::errors::MailsiftError;
    use crate::events::{CollectingEventSink, EventSink};
    use crate::host::PageSource;
    use crate::testing::{
        fast_config, HangingPageSource, MockClipboard, PermissionGatedSource,
        ScriptedPageSource, SAMPLE_EMAILS, SAMPLE_PAGE,
    };
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;

    struct Harness {
        controller: ScrapeController,
        clipboard: MockClipboard,
        sink: Arc<CollectingEventSink>,
    }

    fn harness(source: Arc<dyn PageSource>, config: MailsiftConfig) -> Harness {
        harness_with_clipboard(source, config, MockClipboard::new())
    }

    fn harness_with_clipboard(
        source: Arc<dyn PageSource>,
        config: MailsiftConfig,
        clipboard: MockClipboard,
    ) -> Harness {
        let sink = Arc::new(CollectingEventSink::new());
        let controller = ScrapeController::new(source, Box::new(clipboard.clone()), config)
            .unwrap()
            .with_sink(Arc::clone(&sink) as Arc<dyn EventSink>);
        Harness {
            controller,
            clipboard,
            sink,
        }
    }

    #[tokio::test]
    async fn test_scrape_then_copy() {
        let config = fast_config()
            .with_clipboard(ClipboardOptions::new().with_separator(", ").with_headers(true));
        let h = harness(Arc::new(ScriptedPageSource::new(SAMPLE_PAGE)), config);

        let emails = h.controller.scrape().await.unwrap();
        assert_eq!(emails.as_slice(), &SAMPLE_EMAILS);
        assert_eq!(h.controller.emails(), emails);

        let outcome = h.controller.copy().await;
        assert!(outcome.success);
        assert_eq!(outcome.message, "Copied 3 emails to clipboard");
        assert_eq!(
            h.clipboard.contents().as_deref(),
            Some(
                "Emails found (3):\nsales@example.com, support@help.example.org, \
                 press.team+news@media.example.co.uk"
            )
        );

        let status = h.controller.status().unwrap();
        assert_eq!(status.level, StatusLevel::Success);
        assert_eq!(status.text, "Copied 3 emails to clipboard");
        assert_eq!(
            h.sink.event_types(),
            vec!["scrape.started", "scrape.completed", "clipboard.copied"]
        );
    }

    #[tokio::test]
    async fn test_filter_from_config() {
        let config = fast_config().with_scraping(
            ScrapingOptions::new()
                .with_filter_pattern(r"\.org$")
                .unwrap(),
        );
        let h = harness(Arc::new(ScriptedPageSource::new(SAMPLE_PAGE)), config);
        let emails = h.controller.scrape().await.unwrap();
        assert_eq!(emails.as_slice(), &["support@help.example.org"]);
    }

    #[tokio::test]
    async fn test_trigger_rejected_while_in_flight() {
        let source = ScriptedPageSource::new(SAMPLE_PAGE).with_delay(Duration::from_millis(100));
        let h = harness(Arc::new(source.clone()), fast_config().with_scrape_timeout(2.0));

        let (first, second) = tokio::join!(h.controller.scrape(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert_eq!(h.controller.state(), ScrapeState::InFlight);
            assert_eq!(h.controller.trigger_label(), "Scraping...");
            h.controller.scrape().await
        });

        assert_eq!(first.unwrap().len(), 3);
        assert!(matches!(
            second.unwrap_err(),
            MailsiftError::ScrapeRejected { ref state } if state == "in_flight"
        ));
        assert_eq!(source.capture_count(), 1);
        assert_eq!(h.sink.events_of_type("scrape.rejected").len(), 1);
    }

    #[tokio::test]
    async fn test_cooldown_blocks_then_releases() {
        let config = fast_config().with_cooldown(Duration::from_millis(150));
        let h = harness(Arc::new(ScriptedPageSource::new(SAMPLE_PAGE)), config);

        h.controller.scrape().await.unwrap();
        assert_eq!(h.controller.state(), ScrapeState::CoolingDown);
        assert!(matches!(
            h.controller.scrape().await,
            Err(MailsiftError::ScrapeRejected { .. })
        ));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(h.controller.state(), ScrapeState::Idle);
        assert!(h.controller.scrape().await.is_ok());
    }

    #[tokio::test]
    async fn test_results_replaced_wholesale() {
        let source = ScriptedPageSource::new("<p>old@one.com</p><p>keep@two.com</p>");
        let h = harness(Arc::new(source.clone()), fast_config());

        h.controller.scrape().await.unwrap();
        source.set_markup(Some("<p>new@three.com</p>"));
        h.controller.scrape().await.unwrap();
        assert_eq!(h.controller.emails().as_slice(), &["new@three.com"]);

        source.set_markup(None);
        h.controller.scrape().await.unwrap();
        assert!(h.controller.emails().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_returns_to_idle() {
        let h = harness(Arc::new(HangingPageSource), fast_config());

        let err = h.controller.scrape().await.unwrap_err();
        assert!(matches!(err, MailsiftError::Timeout { .. }));
        assert_eq!(h.controller.state(), ScrapeState::Idle);

        let status = h.controller.status().unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert_eq!(status.text, "Scrape timed out after 0.2s");

        let events = h.sink.events_of_type("scrape.timed_out");
        assert_eq!(events.len(), 1);
        let data = events[0].1.as_ref().unwrap();
        assert_eq!(data["retryable"], serde_json::json!(true));
    }

    #[tokio::test]
    async fn test_permission_granted_retries_once() {
        let source = Arc::new(PermissionGatedSource::granting(SAMPLE_PAGE));
        let h = harness(Arc::clone(&source) as Arc<dyn PageSource>, fast_config());

        let emails = h.controller.scrape().await.unwrap();
        assert_eq!(emails.len(), 3);
        assert_eq!(source.permission_requests(), 1);
    }

    #[tokio::test]
    async fn test_permission_refused() {
        let source = Arc::new(PermissionGatedSource::refusing(SAMPLE_PAGE));
        let h = harness(Arc::clone(&source) as Arc<dyn PageSource>, fast_config());

        let err = h.controller.scrape().await.unwrap_err();
        assert!(matches!(err, MailsiftError::PermissionDenied(_)));
        assert_eq!(source.permission_requests(), 1);
        assert_eq!(h.controller.state(), ScrapeState::Idle);
        let events = h.sink.events_of_type("scrape.failed");
        assert_eq!(events.len(), 1);
        let data = events[0].1.as_ref().unwrap();
        assert_eq!(data["retryable"], serde_json::json!(false));
    }

    #[tokio::test]
    async fn test_copy_without_emails() {
        let h = harness(Arc::new(ScriptedPageSource::new("")), fast_config());

        let outcome = h.controller.copy().await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "No emails to copy");
        assert_eq!(h.clipboard.write_count(), 0);
        assert_eq!(h.sink.event_types(), vec!["clipboard.failed"]);
    }

    #[tokio::test]
    async fn test_copy_failure_message() {
        let h = harness_with_clipboard(
            Arc::new(ScriptedPageSource::new(SAMPLE_PAGE)),
            fast_config(),
            MockClipboard::failing(),
        );
        h.controller.scrape().await.unwrap();

        let outcome = h.controller.copy().await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Failed to copy emails");
        assert_eq!(h.controller.status().unwrap().level, StatusLevel::Error);
        assert_eq!(h.controller.emails().len(), 3);
    }
}
