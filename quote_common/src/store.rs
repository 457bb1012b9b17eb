//! The quote store: an ordered, owned sequence of quotes mirrored to a durable slot.
//!
//! All mutation goes through [`QuoteStore::add`], [`QuoteStore::remove`],
//! [`QuoteStore::merge`] and [`QuoteStore::import`]. Each of them builds the next
//! sequence, rewrites the whole `quotes` slot with it and only then replaces the
//! in-memory sequence; there is no incremental diffing.
//!
//! The store is not synchronized. When it is shared between the client and the sync
//! worker it is wrapped in a `Mutex` (see [`SharedStore`]).

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use rand::Rng;

use crate::category::CategoryFilter;
use crate::error::QuoteError;
use crate::merge::{MergeReport, merge_server_wins};
use crate::quote::{IdSource, Quote, seed_quotes};
use crate::result::Result;
use crate::storage::{KeyValueStore, LEGACY_SELECTED_CATEGORY_KEY, QUOTES_KEY, SELECTED_CATEGORY_KEY};
use crate::transfer::ImportEntry;

/// A store shared between threads.
pub type SharedStore<S> = Arc<Mutex<QuoteStore<S>>>;

/// Ordered quote sequence backed by a durable key-value storage.
#[derive(Debug)]
pub struct QuoteStore<S> {
    storage: S,
    quotes: Vec<Quote>,
    ids: IdSource,
}

impl<S: KeyValueStore> QuoteStore<S> {
    /// Hydrate the store from the `quotes` slot of `storage`.
    ///
    /// Falls back to the built-in seed list when the slot is empty, unreadable or does
    /// not hold a JSON array of quotes. Never fails; problems are logged.
    pub fn load(storage: S) -> Self {
        let quotes = match storage.get(QUOTES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Quote>>(&raw) {
                Ok(quotes) => {
                    debug!("Loaded {} quotes from storage", quotes.len());
                    quotes
                }
                Err(e) => {
                    warn!("Failed to parse stored quotes, using built-in list: {}", e);
                    seed_quotes()
                }
            },
            Ok(None) => {
                debug!("No stored quotes, using built-in list");
                seed_quotes()
            }
            Err(e) => {
                warn!("Failed to read stored quotes, using built-in list: {}", e);
                seed_quotes()
            }
        };
        Self::with_quotes(storage, quotes)
    }

    /// Build a store from an explicit sequence without touching the durable slot.
    pub fn with_quotes(storage: S, quotes: Vec<Quote>) -> Self {
        let floor = quotes.iter().map(|q| q.id).max().unwrap_or(0);
        Self {
            storage,
            quotes,
            ids: IdSource::starting_after(floor),
        }
    }

    /// Wrap the store for sharing with the sync worker.
    pub fn into_shared(self) -> SharedStore<S> {
        Arc::new(Mutex::new(self))
    }

    /// Serialize the full sequence and overwrite the `quotes` slot.
    pub fn save(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.quotes)?;
        self.storage.set(QUOTES_KEY, &json)
    }

    /// Write `candidate` to the `quotes` slot and adopt it only once the write succeeded.
    fn commit(&mut self, candidate: Vec<Quote>) -> Result<()> {
        let json = serde_json::to_string(&candidate)?;
        self.storage.set(QUOTES_KEY, &json)?;
        self.quotes = candidate;
        Ok(())
    }

    fn fresh_id(&mut self, taken: &HashSet<u64>) -> u64 {
        loop {
            let id = self.ids.next_id();
            if !taken.contains(&id) {
                return id;
            }
        }
    }

    /// Append a new quote with a fresh id and persist.
    ///
    /// Both fields are trimmed; if either is empty the store is left unchanged and
    /// `QuoteError::MissingField` is returned. A failed write leaves the store unchanged too.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() {
            return Err(QuoteError::MissingField("text"));
        }
        if category.is_empty() {
            return Err(QuoteError::MissingField("category"));
        }

        let taken: HashSet<u64> = self.quotes.iter().map(|q| q.id).collect();
        let quote = Quote::new(self.fresh_id(&taken), text, category);
        let mut candidate = self.quotes.clone();
        candidate.push(quote.clone());
        self.commit(candidate)?;
        info!("Added quote {} in category {}", quote.id, quote.category);
        Ok(quote)
    }

    /// Remove the first quote with `id` and persist.
    ///
    /// Returns `false` (and still persists) when no quote has that id.
    pub fn remove(&mut self, id: u64) -> Result<bool> {
        let mut candidate = self.quotes.clone();
        let removed = match candidate.iter().position(|q| q.id == id) {
            Some(index) => {
                candidate.remove(index);
                true
            }
            None => false,
        };
        self.commit(candidate)?;
        Ok(removed)
    }

    /// Reconcile with a remote sequence using the server-wins rule and persist.
    ///
    /// An empty `remote` is a no-op: the sequence and the durable slot are untouched.
    pub fn merge(&mut self, remote: &[Quote]) -> Result<MergeReport> {
        if remote.is_empty() {
            return Ok(MergeReport::default());
        }
        let mut candidate = self.quotes.clone();
        let report = merge_server_wins(&mut candidate, remote);
        self.commit(candidate)?;
        for quote in remote {
            self.ids.observe(quote.id);
        }
        Ok(report)
    }

    /// Append imported entries and persist; returns how many were appended.
    ///
    /// Entries keep their id unless it is missing or already used in the store, in
    /// which case a fresh one is assigned.
    pub fn import(&mut self, entries: Vec<ImportEntry>) -> Result<usize> {
        let mut taken: HashSet<u64> = self.quotes.iter().map(|q| q.id).collect();
        let mut candidate = self.quotes.clone();
        let count = entries.len();

        for entry in entries {
            let id = match entry.id {
                Some(id) if !taken.contains(&id) => {
                    self.ids.observe(id);
                    id
                }
                _ => self.fresh_id(&taken),
            };
            taken.insert(id);
            candidate.push(Quote {
                id,
                text: entry.text,
                category: entry.category,
            });
        }
        self.commit(candidate)?;
        info!("Imported {} quotes", count);
        Ok(count)
    }

    /// All quotes in insertion order.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Returns `true` if the store holds no quotes.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// First quote with `id`.
    pub fn get(&self, id: u64) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.id == id)
    }

    /// Unique categories, compared case-insensitively, sorted case-insensitively.
    ///
    /// The spelling of the first quote seen in each category is kept.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut unique: Vec<String> = self
            .quotes
            .iter()
            .filter(|q| seen.insert(q.category.to_lowercase()))
            .map(|q| q.category.clone())
            .collect();
        unique.sort_by_key(|c| c.to_lowercase());
        unique
    }

    /// Quotes passing `filter`, in insertion order.
    pub fn filtered(&self, filter: &CategoryFilter) -> Vec<&Quote> {
        self.quotes.iter().filter(|q| filter.matches(q)).collect()
    }

    /// A uniformly random quote passing `filter`, or `None` if none does.
    pub fn random_quote(&self, filter: &CategoryFilter) -> Option<&Quote> {
        let pool = self.filtered(filter);
        if pool.is_empty() {
            return None;
        }
        let mut rng = rand::rng();
        let index = rng.random_range(0..pool.len());
        Some(pool[index])
    }

    /// Category filter persisted by the last [`select_category`](Self::select_category).
    pub fn selected_category(&self) -> CategoryFilter {
        let stored = self
            .storage
            .get(SELECTED_CATEGORY_KEY)
            .and_then(|value| match value {
                Some(value) => Ok(Some(value)),
                None => self.storage.get(LEGACY_SELECTED_CATEGORY_KEY),
            });
        match stored {
            Ok(Some(value)) => value.parse().unwrap_or_default(),
            Ok(None) => CategoryFilter::All,
            Err(e) => {
                warn!("Failed to read selected category: {}", e);
                CategoryFilter::All
            }
        }
    }

    /// Persist `filter` as the selected category.
    pub fn select_category(&mut self, filter: &CategoryFilter) -> Result<()> {
        self.storage.set(SELECTED_CATEGORY_KEY, &filter.to_string())
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
