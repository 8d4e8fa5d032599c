//! Case- and whitespace-insensitive deduplication.
//!
//! This is the first of two deduplication passes in the pipeline. It decides
//! identity by the normalized key (trimmed, lower-cased). The exporter runs
//! its own exact-literal pass later; see `export::format`. The two passes
//! encode different notions of "same email" and are kept apart on purpose.

use std::collections::HashMap;

use crate::observability::guarded;

/// Insertion-ordered map from normalized key to first-seen literal.
#[derive(Debug, Clone, Default)]
pub struct OrderedEmailSet {
    positions: HashMap<String, usize>,
    entries: Vec<String>,
}

impl OrderedEmailSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Comparison key: trimmed and lower-cased.
    #[must_use]
    pub fn key_for(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Inserts `email` unless an equivalent one was seen.
    ///
    /// Returns true if the literal was kept.
    pub fn insert(&mut self, email: impl Into<String>) -> bool {
        let email = email.into();
        let key = Self::key_for(&email);
        if self.positions.contains_key(&key) {
            return false;
        }
        self.positions.insert(key, self.entries.len());
        self.entries.push(email);
        true
    }

    /// Returns true if an equivalent email was seen.
    #[must_use]
    pub fn contains(&self, email: &str) -> bool {
        self.positions.contains_key(&Self::key_for(email))
    }

    /// Returns the first-seen literal for an equivalent email.
    #[must_use]
    pub fn get(&self, email: &str) -> Option<&str> {
        self.positions
            .get(&Self::key_for(email))
            .map(|&i| self.entries[i].as_str())
    }

    /// Number of distinct emails.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Kept literals in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Consumes the set, returning literals in first-seen order.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.entries
    }
}

impl<S: Into<String>> FromIterator<S> for OrderedEmailSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for email in iter {
            set.insert(email);
        }
        set
    }
}

/// Drops later case/whitespace variants, keeping the first-seen literal.
#[must_use]
pub fn dedupe<S: AsRef<str>>(emails: &[S]) -> Vec<String> {
    guarded("dedupe", Vec::new(), || {
        emails
            .iter()
            .map(|e| e.as_ref().to_string())
            .collect::<OrderedEmailSet>()
            .into_vec()
    })
}

/// [`dedupe`] over untyped input.
///
/// Non-array input yields an empty vector; non-string entries are skipped.
#[must_use]
pub fn dedupe_value(value: &serde_json::Value) -> Vec<String> {
    match value.as_array() {
        Some(items) => {
            let emails: Vec<&str> = items.iter().filter_map(serde_json::Value::as_str).collect();
            dedupe(&emails)
        }
        None => Vec::new(),
    }
}
