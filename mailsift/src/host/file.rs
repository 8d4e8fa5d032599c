//! Page markup from a saved file or stdin.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use super::PageSource;
use crate::errors::Result;

/// Reads a saved page from disk, or from stdin when no path is given.
///
/// Invalid UTF-8 is replaced rather than rejected.
#[derive(Debug, Clone, Default)]
pub struct FilePageSource {
    path: Option<PathBuf>,
}

impl FilePageSource {
    /// Reads `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Reads stdin.
    #[must_use]
    pub fn stdin() -> Self {
        Self { path: None }
    }
}

#[async_trait]
impl PageSource for FilePageSource {
    fn describe(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "stdin".to_string(), |p| p.display().to_string())
    }

    async fn capture(&self) -> Result<Option<String>> {
        let bytes = match &self.path {
            Some(path) => tokio::fs::read(path).await?,
            None => {
                let mut buf = Vec::new();
                tokio::io::stdin().read_to_end(&mut buf).await?;
                buf
            }
        };
        tracing::debug!(source = %self.describe(), bytes = bytes.len(), "Captured page");
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}
