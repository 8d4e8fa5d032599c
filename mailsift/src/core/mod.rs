//! Core domain types for mailsift.
//!
//! - Option structs for extraction and clipboard export
//! - The ordered email sequence
//! - Scrape lifecycle state

mod options;
mod sequence;
mod state;

pub use options::{ClipboardOptions, FilterPattern, ScrapingOptions};
pub use sequence::EmailSequence;
pub use state::ScrapeState;
