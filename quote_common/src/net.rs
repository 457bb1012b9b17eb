//! Shared remote endpoint constants and small helpers used by the sync worker and client.

/// Base URL of the public mock collection used as the quote server.
pub const DEFAULT_SERVER_URL: &str = "https://jsonplaceholder.typicode.com";
/// Collection path on the quote server (GET lists, POST creates).
pub const POSTS_PATH: &str = "posts";
/// Number of remote items requested per sync cycle.
pub const FETCH_LIMIT: usize = 5;
/// Placeholder category assigned to every quote fetched from the server.
pub const SERVER_CATEGORY: &str = "Server";
/// Seconds between two periodic sync cycles.
pub const SYNC_INTERVAL_SECS: u64 = 30;

/// Helper to join a base URL and the posts collection like "base/posts".
pub fn posts_url(base: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), POSTS_PATH)
}
