//! Server synchronization for the quote store.
//!
//! This crate wires the store from `quote_common` to the remote quote server:
//!
//! - `remote`: `RemoteSource` trait with the blocking HTTP implementation (`HttpRemote`)
//!   and a no-network stand-in (`OfflineRemote`).
//! - `worker`: the fetch-and-merge cycle (`run_cycle`) and the `SyncWorker` thread that
//!   serializes every cycle of a session (startup, periodic and manual) and posts added
//!   quotes.
//! - `outcome`: `SyncTrigger` and `SyncOutcome`, including the status line shown to the
//!   user after each cycle.
//!
//! Failures never escape a cycle: a failed fetch is logged and treated as "no server
//! data", so the local store is left untouched for that cycle.
#![warn(missing_docs)]
use std::time::Duration;

use quote_common::net::{DEFAULT_SERVER_URL, FETCH_LIMIT, SERVER_CATEGORY, SYNC_INTERVAL_SECS};

pub mod outcome;
pub mod remote;
pub mod worker;

pub use outcome::{SyncOutcome, SyncTrigger};
pub use remote::{HttpRemote, OfflineRemote, RemoteSource};
pub use worker::{SyncHandle, SyncWorker, run_cycle};

/// Settings of the remote server and the sync schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Base URL of the quote server.
    pub server_url: String,
    /// Number of items fetched per cycle.
    pub fetch_limit: usize,
    /// Category given to every fetched quote.
    pub server_category: String,
    /// Time between periodic cycles.
    pub interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            fetch_limit: FETCH_LIMIT,
            server_category: SERVER_CATEGORY.to_string(),
            interval: Duration::from_secs(SYNC_INTERVAL_SECS),
        }
    }
}
