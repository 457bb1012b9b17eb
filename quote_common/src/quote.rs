//! Quote data model, identifier source and the built-in seed list.
//!
//! A `Quote` is the record held by the store, persisted to the durable slot, posted to
//! the server and exchanged through JSON import/export. Identifiers come from
//! [`IdSource`], which derives them from the wall clock in milliseconds.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A single quote with its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Identifier, unique within a store.
    pub id: u64,
    /// Quote text. Never empty.
    pub text: String,
    /// Category name. Never empty; compared case-insensitively.
    pub category: String,
}

impl Quote {
    /// Create a quote from its parts.
    pub fn new(id: u64, text: &str, category: &str) -> Self {
        Quote {
            id,
            text: String::from(text),
            category: String::from(category),
        }
    }

    /// Returns `true` if the quote belongs to `category`, ignoring case.
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }
}

/// Largest id accepted from outside: the biggest integer a JSON number keeps exactly.
pub const MAX_QUOTE_ID: u64 = (1 << 53) - 1;

/// Monotonic identifier source derived from the wall clock.
///
/// Every id is the current UTC time in milliseconds, bumped past the previously issued
/// id when the clock has not advanced (or went backwards). Observed ids above
/// [`MAX_QUOTE_ID`] are ignored, so issued ids never approach `u64::MAX`.
#[derive(Debug, Default)]
pub struct IdSource {
    last: u64,
}

impl IdSource {
    /// Create a source whose next id is strictly greater than `floor`.
    pub fn starting_after(floor: u64) -> Self {
        let mut ids = Self::default();
        ids.observe(floor);
        ids
    }

    /// Issue the next identifier.
    pub fn next_id(&mut self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let id = now.max(self.last.saturating_add(1));
        self.last = id;
        id
    }

    /// Make sure future ids are greater than `id`.
    pub fn observe(&mut self, id: u64) {
        if id <= MAX_QUOTE_ID {
            self.last = self.last.max(id);
        }
    }
}

/// Built-in quotes used when nothing usable is persisted yet.
pub fn seed_quotes() -> Vec<Quote> {
    vec![
        Quote::new(1, "The best way to predict the future is to invent it.", "Inspiration"),
        Quote::new(2, "Life is what happens when you’re busy making other plans.", "Life"),
        Quote::new(3, "In the middle of every difficulty lies opportunity.", "Motivation"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_strictly_increasing() {
        let mut ids = IdSource::default();
        let first = ids.next_id();
        let second = ids.next_id();
        let third = ids.next_id();
        assert!(first < second && second < third);
    }

    #[test]
    fn ids_skip_past_observed_values() {
        let far_future = Utc::now().timestamp_millis() as u64 + 1_000_000;
        let mut ids = IdSource::starting_after(far_future);
        assert_eq!(ids.next_id(), far_future + 1);
        ids.observe(far_future + 10);
        assert_eq!(ids.next_id(), far_future + 11);
    }

    #[test]
    fn out_of_range_ids_do_not_saturate_the_source() {
        let mut ids = IdSource::starting_after(u64::MAX);
        ids.observe(u64::MAX);
        let first = ids.next_id();
        let second = ids.next_id();
        assert!(first < second);
        assert!(second < u64::MAX);
    }

    #[test]
    fn category_comparison_ignores_case() {
        let quote = Quote::new(7, "Stay hungry.", "Life");
        assert!(quote.in_category("LIFE"));
        assert!(!quote.in_category("Work"));
    }

    #[test]
    fn serializes_with_expected_field_names() {
        let quote = Quote::new(1, "A", "X");
        let json = serde_json::to_string(&quote).unwrap();
        assert_eq!(json, r#"{"id":1,"text":"A","category":"X"}"#);
    }
}
