//! Client-side facade over the shared store and the session slot.
//!
//! Both the one-shot commands and the interactive shell go through `QuoteApp`, so every
//! mutation reaches the store through its `add`/`remove`/`import` operations while the
//! sync worker may hold the same store for a merge.
use std::path::Path;
use std::sync::MutexGuard;

use log::warn;
use quote_common::session::Session;
use quote_common::storage::KeyValueStore;
use quote_common::transfer::{read_import, write_export};
use quote_common::{CategoryFilter, Quote, QuoteStore, Result, SharedStore};

/// Store handle plus the session of the running client.
pub struct QuoteApp<S> {
    store: SharedStore<S>,
    session: Session,
}

impl<S: KeyValueStore> QuoteApp<S> {
    /// Wrap a loaded store with a fresh session.
    pub fn new(store: QuoteStore<S>) -> Self {
        Self {
            store: store.into_shared(),
            session: Session::default(),
        }
    }

    /// Shared store, for handing to the sync worker.
    pub fn store(&self) -> &SharedStore<S> {
        &self.store
    }

    fn lock(&self) -> Result<MutexGuard<'_, QuoteStore<S>>> {
        Ok(self.store.lock()?)
    }

    /// Snapshot of all quotes.
    pub fn list(&self) -> Result<Vec<Quote>> {
        Ok(self.lock()?.quotes().to_vec())
    }

    /// Validate, append and persist a quote.
    pub fn add(&self, text: &str, category: &str) -> Result<Quote> {
        self.lock()?.add(text, category)
    }

    /// Remove a quote by id; `false` if it was not there.
    pub fn remove(&self, id: u64) -> Result<bool> {
        self.lock()?.remove(id)
    }

    /// Pick a random quote passing `filter` and remember it as last viewed.
    pub fn show_random(&mut self, filter: &CategoryFilter) -> Result<Option<Quote>> {
        let picked = self.lock()?.random_quote(filter).cloned();
        if let Some(quote) = &picked {
            if let Err(e) = self.session.record_view(quote) {
                warn!("Failed to remember last viewed quote: {}", e);
            }
        }
        Ok(picked)
    }

    /// Persist `filter` as the selected category and show a random quote from it.
    pub fn filter(&mut self, filter: &CategoryFilter) -> Result<Option<Quote>> {
        self.lock()?.select_category(filter)?;
        self.show_random(filter)
    }

    /// Known categories and the persisted selection.
    pub fn categories(&self) -> Result<(Vec<String>, CategoryFilter)> {
        let store = self.lock()?;
        Ok((store.categories(), store.selected_category()))
    }

    /// Selected category restored from the durable slot.
    pub fn selected_category(&self) -> Result<CategoryFilter> {
        Ok(self.lock()?.selected_category())
    }

    /// Quote last shown in this session.
    pub fn last_viewed(&self) -> Option<Quote> {
        self.session.last_viewed()
    }

    /// Write all quotes to `path`; returns how many were written.
    pub fn export(&self, path: &Path) -> Result<usize> {
        let quotes = self.list()?;
        write_export(path, &quotes)?;
        Ok(quotes.len())
    }

    /// Append the quotes of the JSON file at `path`; returns how many were added.
    pub fn import(&self, path: &Path) -> Result<usize> {
        let entries = read_import(path)?;
        self.lock()?.import(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_common::storage::MemoryStorage;

    fn app() -> QuoteApp<MemoryStorage> {
        QuoteApp::new(QuoteStore::with_quotes(
            MemoryStorage::new(),
            vec![Quote::new(1, "A", "Life"), Quote::new(2, "B", "Art")],
        ))
    }

    #[test]
    fn showing_a_quote_records_it_in_the_session() {
        let mut app = app();
        assert_eq!(app.last_viewed(), None);

        let shown = app.show_random(&CategoryFilter::Named("art".into())).unwrap();

        assert_eq!(shown, Some(Quote::new(2, "B", "Art")));
        assert_eq!(app.last_viewed(), shown);
    }

    #[test]
    fn filter_persists_selection() {
        let mut app = app();
        let shown = app.filter(&CategoryFilter::Named("Nothing".into())).unwrap();

        assert_eq!(shown, None);
        assert_eq!(
            app.selected_category().unwrap(),
            CategoryFilter::Named("Nothing".into())
        );
        assert_eq!(app.last_viewed(), None);
    }

    #[test]
    fn blank_add_leaves_list_unchanged() {
        let app = app();
        assert!(app.add("", "Life").is_err());
        assert_eq!(app.list().unwrap().len(), 2);
    }
}
