//! Testing utilities.
//!
//! This module provides:
//! - In-memory clipboard and page source doubles
//! - Sample pages with their expected extraction

mod fixtures;
mod mocks;

pub use fixtures::{fast_config, SAMPLE_EMAILS, SAMPLE_PAGE};
pub use mocks::{HangingPageSource, MockClipboard, PermissionGatedSource, ScriptedPageSource};
