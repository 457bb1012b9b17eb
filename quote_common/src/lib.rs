//!
//! Common types and utilities shared by the quote sync worker and client.
//!
//! This crate aggregates:
//! - `error`: unified error type `QuoteError` used across the workspace.
//! - `result`: handy `Result<T, QuoteError>` alias.
//! - `quote`: the `Quote` record, its id source and the built-in seed list.
//! - `storage`: durable and in-memory key-value slots.
//! - `store`: the `QuoteStore` and its add/remove/merge/import operations.
//! - `merge`: the server-wins merge engine.
//! - `category`: category filter selected by the user.
//! - `session`: session-scoped last-viewed quote.
//! - `transfer`: JSON export and import.
//! - `net`: remote endpoint constants and small helpers.
#![warn(missing_docs)]
pub mod category;
pub mod error;
pub mod merge;
pub mod net;
pub mod quote;
pub mod result;
pub mod session;
pub mod storage;
pub mod store;
pub mod transfer;

pub use category::CategoryFilter;
pub use error::QuoteError;
pub use merge::MergeReport;
pub use quote::Quote;
pub use result::Result;
pub use store::{QuoteStore, SharedStore};
