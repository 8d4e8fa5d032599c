//! The extraction pipeline: scan, normalize, validate, dedupe, filter.

use std::sync::Arc;

use super::dedupe::OrderedEmailSet;
use super::patterns::scan_candidates;
use super::validator::{is_valid_email, normalize_email};
use crate::core::{EmailSequence, ScrapingOptions};
use crate::events::{get_event_sink, EventSink};
use crate::observability::{guarded_with, SpanTimer};

/// Runs the pipeline against one blob of page content.
///
/// Holds the sink that faults are reported to; defaults to the process-wide
/// sink at call time.
#[derive(Clone, Default)]
pub struct Extractor {
    sink: Option<Arc<dyn EventSink>>,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("dedicated_sink", &self.sink.is_some())
            .finish()
    }
}

impl Extractor {
    /// Creates an extractor reporting to the process-wide sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports faults to `sink` instead of the process-wide sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Extracts emails from `content`.
    ///
    /// Output is lower-cased. Never fails: internal faults are reported and
    /// produce an empty sequence.
    #[must_use]
    pub fn extract(&self, content: &str, options: &ScrapingOptions) -> EmailSequence {
        self.contained(|| run_pipeline(content, options))
    }

    /// Runs `f`, reporting a fault as `extraction.failed` and yielding an
    /// empty sequence.
    fn contained(&self, f: impl FnOnce() -> EmailSequence) -> EmailSequence {
        let sink = self.sink.clone().unwrap_or_else(get_event_sink);
        guarded_with(sink.as_ref(), "extraction", EmailSequence::new(), f)
    }

    /// Extracts from optional content; `None` yields an empty sequence.
    #[must_use]
    pub fn extract_opt(&self, content: Option<&str>, options: &ScrapingOptions) -> EmailSequence {
        content.map_or_else(EmailSequence::new, |c| self.extract(c, options))
    }

    /// Extracts from untyped content; anything but a JSON string yields an
    /// empty sequence.
    #[must_use]
    pub fn extract_value(
        &self,
        content: &serde_json::Value,
        options: &ScrapingOptions,
    ) -> EmailSequence {
        self.extract_opt(content.as_str(), options)
    }
}

fn run_pipeline(content: &str, options: &ScrapingOptions) -> EmailSequence {
    let timer = SpanTimer::start("extraction");
    let mut scanned = 0usize;

    let validated = scan_candidates(content).filter_map(|candidate| {
        scanned += 1;
        normalize_email(candidate).filter(|email| is_valid_email(email))
    });

    let unique: Vec<String> = if options.include_duplicates {
        validated.collect()
    } else {
        let mut seen = OrderedEmailSet::new();
        for email in validated {
            seen.insert(email);
        }
        seen.into_vec()
    };

    let emails: EmailSequence = match &options.filter_pattern {
        Some(filter) => unique.into_iter().filter(|e| filter.is_match(e)).collect(),
        None => unique.into(),
    };

    tracing::debug!(
        scanned,
        kept = emails.len(),
        content_len = content.len(),
        duration_ms = timer.finish(),
        "Extraction finished"
    );
    emails
}

/// Extracts emails from `content` with the process-wide sink.
#[must_use]
pub fn extract(content: &str, options: &ScrapingOptions) -> EmailSequence {
    Extractor::new().extract(content, options)
}
