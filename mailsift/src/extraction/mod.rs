//! Email extraction and normalization.
//!
//! The extractor scans raw page content with a permissive pattern, trims
//! and lower-cases each candidate, validates it against a stricter
//! grammar, deduplicates case-insensitively and finally applies an optional
//! caller-supplied filter.

mod dedupe;
mod extractor;
mod patterns;
mod validator;

pub use dedupe::{dedupe, dedupe_value, OrderedEmailSet};
pub use extractor::{extract, Extractor};
pub use patterns::{scan_candidates, SCAN_CANDIDATE, STRICT_EMAIL};
pub use validator::{is_valid_email, normalize_email};
