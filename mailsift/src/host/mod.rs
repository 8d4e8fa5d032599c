//! Host page-scripting boundary.
//!
//! A [`PageSource`] stands in for the host facility that runs a snippet
//! inside the current page and hands back the page markup. The snippet
//! itself is [`PageScript`]; [`inject_script`] runs it against a source and
//! answers over the reply channel.

mod file;
#[cfg(feature = "fetch")]
mod http;
mod script;
mod static_source;

pub use file::FilePageSource;
#[cfg(feature = "fetch")]
pub use http::HttpPageSource;
pub use script::{inject_script, PageScript};
pub use static_source::StaticPageSource;

use async_trait::async_trait;

use crate::errors::Result;

/// Produces the rendered markup of the page being scraped.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Short description for logs (a path, a URL, `stdin`).
    fn describe(&self) -> String;

    /// Returns the page markup.
    ///
    /// `Ok(None)` means the host ran but produced nothing usable; the
    /// snippet treats that as an empty page.
    async fn capture(&self) -> Result<Option<String>>;

    /// Asks the host for permission to run scripts on the page.
    ///
    /// Returns true if a retry is worthwhile.
    async fn request_permission(&self) -> Result<bool> {
        Ok(false)
    }
}
