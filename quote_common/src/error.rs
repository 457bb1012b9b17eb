//! Error types shared between the store, the sync worker and the client.
//!
//! The `QuoteError` enum unifies common failure cases for I/O, JSON handling,
//! HTTP calls, input validation, channel communication and lock poisoning, allowing
//! crates to propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by all crates of the workspace.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// I/O error originating from the standard library (slot files, import/export files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level failure of an HTTP request to the quote server.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The quote server answered with a non-success status code.
    #[error("Server responded with status {status}")]
    Server {
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// A required quote field was empty after trimming whitespace.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Imported JSON document was valid JSON but not an array.
    #[error("Invalid JSON format. Must be an array of quotes.")]
    NotAnArray,

    /// Imported JSON array contained no acceptable quote entries.
    #[error("No valid quotes found in JSON.")]
    NoValidQuotes,

    /// Key-value storage could not be used (bad key, unusable data directory).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Crossbeam/channel send failed (e.g., worker stopped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Crossbeam/channel receive failed (e.g., worker dropped the reply); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for QuoteError {
    fn from(err: PoisonError<T>) -> Self {
        QuoteError::MutexLock(err.to_string())
    }
}
