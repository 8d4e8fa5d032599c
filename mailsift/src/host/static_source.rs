//! In-memory page source.

use async_trait::async_trait;

use super::PageSource;
use crate::errors::Result;

/// A page whose markup is already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticPageSource {
    content: Option<String>,
}

impl StaticPageSource {
    /// Serves `content`.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    /// A host that yields no content at all.
    #[must_use]
    pub fn absent() -> Self {
        Self { content: None }
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    fn describe(&self) -> String {
        "static".to_string()
    }

    async fn capture(&self) -> Result<Option<String>> {
        Ok(self.content.clone())
    }
}
