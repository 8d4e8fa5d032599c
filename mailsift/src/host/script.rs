//! The snippet that runs inside the page.

use std::sync::Arc;
use tokio::task::JoinHandle;

use super::PageSource;
use crate::channel::{ReplyHandle, ScrapeRequest};
use crate::core::EmailSequence;
use crate::errors::Result;
use crate::extraction::Extractor;

/// Runs the extractor over captured page content.
#[derive(Debug, Clone, Default)]
pub struct PageScript {
    extractor: Extractor,
}

impl PageScript {
    /// Creates a snippet around `extractor`.
    #[must_use]
    pub fn new(extractor: Extractor) -> Self {
        Self { extractor }
    }

    /// Extracts from whatever the host produced.
    #[must_use]
    pub fn run(&self, content: Option<&str>, request: &ScrapeRequest) -> EmailSequence {
        self.extractor.extract_opt(content, &request.options)
    }

    /// Captures the page, extracts, and answers on `reply`.
    ///
    /// A capture failure drops `reply` unanswered and is returned so the
    /// injecting side can report it.
    pub async fn execute(
        &self,
        source: &dyn PageSource,
        request: &ScrapeRequest,
        reply: ReplyHandle,
    ) -> Result<()> {
        let content = source.capture().await?;
        let emails = self.run(content.as_deref(), request);
        tracing::debug!(
            request_id = %request.request_id,
            source = %source.describe(),
            count = emails.len(),
            "Page script finished"
        );
        if !reply.reply(emails) {
            tracing::debug!(request_id = %request.request_id, "Reply receiver already gone");
        }
        Ok(())
    }
}

/// Runs `script` against `source` on a background task.
///
/// The emails arrive on the channel paired with `reply`; the join handle
/// carries the capture error, if any.
pub fn inject_script(
    source: Arc<dyn PageSource>,
    script: PageScript,
    request: ScrapeRequest,
    reply: ReplyHandle,
) -> JoinHandle<Result<()>> {
    tokio::spawn(async move { script.execute(source.as_ref(), &request, reply).await })
}
