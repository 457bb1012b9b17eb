//! JSON export and import of the quote sequence.
//!
//! Exports are the full ordered sequence as a pretty-printed JSON array. Imports must
//! be a JSON array; each element has to be an object with non-blank string `text` and
//! `category` fields, everything else is skipped. Accepted entries are handed to
//! [`QuoteStore::import`](crate::store::QuoteStore::import), which appends them.
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde_json::Value;

use crate::error::QuoteError;
use crate::quote::{MAX_QUOTE_ID, Quote};
use crate::result::Result;

/// Default file name offered for exports.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// A validated entry of an imported document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// Identifier carried by the document, if it had one in `1..=MAX_QUOTE_ID`.
    pub id: Option<u64>,
    /// Quote text, trimmed.
    pub text: String,
    /// Category, trimmed.
    pub category: String,
}

/// Serialize `quotes` as a pretty-printed JSON array.
pub fn export_json(quotes: &[Quote]) -> Result<String> {
    Ok(serde_json::to_string_pretty(quotes)?)
}

/// Write the export document for `quotes` to `path`.
pub fn write_export(path: impl AsRef<Path>, quotes: &[Quote]) -> Result<()> {
    let path = path.as_ref();
    let document = export_json(quotes)?;
    fs::write(path, document)?;
    debug!("Exported {} quotes to {}", quotes.len(), path.display());
    Ok(())
}

/// Parse an import document into the entries that can be appended.
pub fn parse_import(document: &str) -> Result<Vec<ImportEntry>> {
    let parsed: Value = serde_json::from_str(document)?;
    let Value::Array(items) = parsed else {
        return Err(QuoteError::NotAnArray);
    };

    let total = items.len();
    let entries: Vec<ImportEntry> = items.iter().filter_map(entry_from_value).collect();
    if entries.is_empty() {
        return Err(QuoteError::NoValidQuotes);
    }
    if entries.len() < total {
        warn!("Skipped {} invalid entries while importing", total - entries.len());
    }
    Ok(entries)
}

/// Read and parse the import document at `path`.
pub fn read_import(path: impl AsRef<Path>) -> Result<Vec<ImportEntry>> {
    let document = fs::read_to_string(path)?;
    parse_import(&document)
}

fn entry_from_value(value: &Value) -> Option<ImportEntry> {
    let object = value.as_object()?;
    let text = object.get("text")?.as_str()?.trim();
    let category = object.get("category")?.as_str()?.trim();
    if text.is_empty() || category.is_empty() {
        return None;
    }
    let id = object
        .get("id")
        .and_then(Value::as_u64)
        .filter(|id| (1..=MAX_QUOTE_ID).contains(id));

    Some(ImportEntry {
        id,
        text: text.to_string(),
        category: category.to_string(),
    })
}
