//! Scan and validation grammars.
//!
//! The scan grammar is deliberately looser than the validation grammar: it
//! runs over whole documents (tags, attributes, inline scripts) and only has
//! to find token-shaped `local@domain.tld` runs. Everything it finds goes
//! through [`STRICT_EMAIL`] afterwards.

use regex::Regex;
use std::sync::LazyLock;

/// Permissive scan over raw markup.
///
/// Accepts either letter case and underscores in the domain; the strict pass
/// rejects the latter.
pub static SCAN_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9._\-]+\.[A-Za-z]{2,}")
        .expect("scan pattern is a valid regex")
});

/// Strict grammar applied to trimmed, lower-cased candidates.
///
/// Local part `[a-z0-9._%+-]`, domain `[a-z0-9.-]` containing at least one
/// dot, final label of two or more letters.
pub static STRICT_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}$")
        .expect("strict pattern is a valid regex")
});

/// Yields every candidate substring in `content`, in document order.
pub fn scan_candidates(content: &str) -> impl Iterator<Item = &str> {
    SCAN_CANDIDATE.find_iter(content).map(|m| m.as_str())
}
