//! Live page fetch (feature `fetch`).

use async_trait::async_trait;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use std::time::Duration;

use super::PageSource;
use crate::errors::{MailsiftError, Result};

const USER_AGENT: &str = concat!("mailsift/", env!("CARGO_PKG_VERSION"));

/// Fetches a URL and returns the `<body>` markup.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    url: String,
    timeout: Duration,
}

impl HttpPageSource {
    /// Fetches `url` with a 30 second timeout.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the inner markup of `<body>`, or the whole document if it has
    /// none.
    #[must_use]
    pub fn body_markup(document: &str) -> String {
        let html = Html::parse_document(document);
        let Ok(selector) = Selector::parse("body") else {
            return document.to_string();
        };
        html.select(&selector)
            .next()
            .map_or_else(|| document.to_string(), |body| body.inner_html())
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn capture(&self) -> Result<Option<String>> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| MailsiftError::source_error(e.to_string()))?;

        let response = client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| MailsiftError::source_error(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(MailsiftError::permission_denied(format!(
                "{} returned {status}",
                self.url
            )));
        }
        if !status.is_success() {
            return Err(MailsiftError::source_error(format!(
                "{} returned {status}",
                self.url
            )));
        }

        let document = response
            .text()
            .await
            .map_err(|e| MailsiftError::source_error(e.to_string()))?;
        Ok(Some(Self::body_markup(&document)))
    }
}
