//! # Mailsift
//!
//! Finds email addresses in page markup and prepares them for the clipboard.
//!
//! The core is three pure functions with no hidden state:
//!
//! - **[`extract`]**: loose scan, normalization, strict validation,
//!   case-insensitive dedupe and an optional filter
//! - **[`dedupe`]**: order-preserving, case-insensitive, first literal wins
//! - **[`format_for_clipboard`]**: exact-literal dedupe, optional header,
//!   separator join
//!
//! Around them sit the page-scripting boundary ([`host`]), a one-shot reply
//! channel with a deadline ([`channel`]), clipboard backends ([`export`])
//! and a [`controller::ScrapeController`] that serializes scrapes.
//!
//! ## Quick Start
//!
//! ```rust
//! use mailsift::prelude::*;
//!
//! let emails = extract(
//!     "Contact: Jane@Example.com, jane@example.com, bob@sub.example.co.uk",
//!     &ScrapingOptions::default(),
//! );
//! assert_eq!(emails.as_slice(), &["jane@example.com", "bob@sub.example.co.uk"]);
//!
//! let text = format_for_clipboard(emails.as_slice(), &ClipboardOptions::new().with_separator("\n"));
//! assert_eq!(text, "jane@example.com\nbob@sub.example.co.uk");
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod channel;
pub mod config;
pub mod controller;
pub mod core;
pub mod errors;
pub mod events;
pub mod export;
pub mod extraction;
pub mod host;
pub mod observability;
pub mod testing;

pub use export::format_for_clipboard;
pub use extraction::{dedupe, extract, is_valid_email};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::channel::{request_channel, PendingReply, ReplyHandle, ScrapeReply, ScrapeRequest};
    pub use crate::config::MailsiftConfig;
    pub use crate::controller::{ScrapeController, StatusLevel, StatusMessage};
    pub use crate::core::{ClipboardOptions, EmailSequence, FilterPattern, ScrapeState, ScrapingOptions};
    pub use crate::errors::{MailsiftError, Result};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::export::{
        copy_emails_to_clipboard, copy_to_clipboard, format_for_clipboard, ClipboardBackend,
        CopyOutcome,
    };
    pub use crate::extraction::{dedupe, extract, is_valid_email, normalize_email, Extractor};
    pub use crate::host::{FilePageSource, PageScript, PageSource, StaticPageSource};
}
