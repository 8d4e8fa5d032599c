//! Span timing.

use std::time::Instant;

/// Measures one operation.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: String,
}

impl SpanTimer {
    /// Starts a new span timer.
    #[must_use]
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Returns the span name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finishes the span, logs it at TRACE and returns the duration.
    #[must_use]
    pub fn finish(self) -> f64 {
        let duration_ms = self.elapsed_ms();
        tracing::trace!(span_name = %self.name, duration_ms, "Span finished");
        duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_timer() {
        let timer = SpanTimer::start("extract");
        assert_eq!(timer.name(), "extract");
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.finish() >= 5.0);
    }
}
