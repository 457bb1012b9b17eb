use anyhow::Result;
use quote_common::storage::{FileStorage, KeyValueStore, QUOTES_KEY};
use quote_common::{CategoryFilter, MergeReport, Quote, QuoteError, QuoteStore};
use tempfile::{TempDir, tempdir};

fn open_store(dir: &TempDir) -> Result<QuoteStore<FileStorage>> {
    Ok(QuoteStore::load(FileStorage::open(dir.path())?))
}

fn persisted(dir: &TempDir) -> Result<Option<String>> {
    Ok(FileStorage::open(dir.path())?.get(QUOTES_KEY)?)
}

#[test]
fn given_valid_input_when_adding_then_length_grows_by_one_and_is_persisted() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let mut store = open_store(&dir)?;
    let before = store.len();

    // Act
    let added = store.add("Simplicity is the soul of efficiency.", "Engineering")?;

    // Assert
    assert_eq!(store.len(), before + 1);
    let reloaded = open_store(&dir)?;
    assert_eq!(reloaded.len(), before + 1);
    assert_eq!(reloaded.get(added.id), Some(&added));
    Ok(())
}

#[test]
fn given_blank_text_or_category_when_adding_then_store_is_unchanged() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let mut store = open_store(&dir)?;
    let before = store.len();

    // Act
    let blank_text = store.add("   ", "Life");
    let blank_category = store.add("Something", "");

    // Assert
    assert!(matches!(blank_text, Err(QuoteError::MissingField(_))));
    assert!(matches!(blank_category, Err(QuoteError::MissingField(_))));
    assert_eq!(store.len(), before);
    assert_eq!(persisted(&dir)?, None);
    Ok(())
}

#[test]
fn given_empty_remote_when_merging_then_sequence_and_slot_are_unchanged() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let mut store = open_store(&dir)?;
    store.add("Persist me first.", "Setup")?;
    let quotes_before = store.quotes().to_vec();
    let slot_before = persisted(&dir)?;

    // Act
    let report = store.merge(&[])?;

    // Assert
    assert_eq!(report, MergeReport { added: 0, conflicts: 0 });
    assert_eq!(store.quotes(), quotes_before.as_slice());
    assert_eq!(persisted(&dir)?, slot_before);
    Ok(())
}

#[test]
fn given_new_remote_id_when_merging_then_one_addition_is_reported() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let mut store = open_store(&dir)?;
    let before = store.len();

    // Act
    let report = store.merge(&[Quote::new(100, "From the server", "Server")])?;

    // Assert
    assert_eq!(report, MergeReport { added: 1, conflicts: 0 });
    assert_eq!(store.len(), before + 1);
    Ok(())
}

#[test]
fn given_conflicting_text_when_merging_then_server_wins_and_reload_reflects_it() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let mut store = open_store(&dir)?;

    // Act
    let report = store.merge(&[Quote::new(2, "Overwritten by the server", "Server")])?;

    // Assert
    assert_eq!(report, MergeReport { added: 0, conflicts: 1 });
    let reloaded = open_store(&dir)?;
    assert_eq!(
        reloaded.get(2),
        Some(&Quote::new(2, "Overwritten by the server", "Server"))
    );
    Ok(())
}

#[test]
fn given_single_local_quote_when_merging_conflict_then_result_matches_example() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let storage = FileStorage::open(dir.path())?;
    let mut store = QuoteStore::with_quotes(storage, vec![Quote::new(1, "A", "X")]);

    // Act
    let report = store.merge(&[Quote::new(1, "B", "Y")])?;

    // Assert
    assert_eq!(store.quotes(), &[Quote::new(1, "B", "Y")]);
    assert_eq!(report.conflicts, 1);
    assert_eq!(report.added, 0);
    Ok(())
}

#[test]
fn given_removed_quote_when_reloading_then_it_stays_removed() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let mut store = open_store(&dir)?;

    // Act
    let removed = store.remove(1)?;
    let removed_again = store.remove(1)?;

    // Assert
    assert!(removed);
    assert!(!removed_again);
    let reloaded = open_store(&dir)?;
    assert!(reloaded.get(1).is_none());
    assert_eq!(reloaded.len(), 2);
    Ok(())
}

#[test]
fn given_selected_category_when_reloading_then_filter_is_restored() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let mut store = open_store(&dir)?;

    // Act
    store.select_category(&CategoryFilter::Named("Life".into()))?;

    // Assert
    let reloaded = open_store(&dir)?;
    assert_eq!(reloaded.selected_category(), CategoryFilter::Named("Life".into()));
    Ok(())
}

#[test]
fn given_corrupt_slot_when_loading_then_seed_is_used() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    FileStorage::open(dir.path())?.set(QUOTES_KEY, "[{\"id\": 1,")?;

    // Act
    let store = open_store(&dir)?;

    // Assert
    assert_eq!(store.quotes(), quote_common::quote::seed_quotes().as_slice());
    Ok(())
}
