//! What started a sync cycle and how it ended.
//!
//! `SyncOutcome` renders the single status-line convention shown after every cycle:
//!
//! - merged: `Quotes synced with server! 2 new, 1 conflicts resolved.`
//! - nothing fetched: `Quotes synced with server! No server data this cycle.`
//! - local write failed: `Sync failed: <reason>`
use std::fmt;

use quote_common::MergeReport;
use strum_macros::{Display, EnumString};

/// Prefix shared by every successful status line.
pub const SYNC_STATUS: &str = "Quotes synced with server!";

/// Reason a sync cycle was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SyncTrigger {
    /// First cycle, right after the worker starts.
    Startup,
    /// Periodic timer tick.
    Interval,
    /// Explicit user request.
    Manual,
}

/// Result of one sync cycle. Never an error: failures degrade to a neutral outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote data was merged into the store and persisted.
    Merged(MergeReport),
    /// The fetch failed or returned nothing; the store was not touched.
    NoRemoteData,
    /// The merge ran but the store could not be persisted.
    StorageFailed(String),
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Merged(report) => write!(
                f,
                "{} {} new, {} conflicts resolved.",
                SYNC_STATUS, report.added, report.conflicts
            ),
            SyncOutcome::NoRemoteData => write!(f, "{} No server data this cycle.", SYNC_STATUS),
            SyncOutcome::StorageFailed(reason) => write!(f, "Sync failed: {}", reason),
        }
    }
}
