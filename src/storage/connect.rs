//! Database connection acquisition.

use crate::error::Result;
use crate::storage::retry::{with_retry, RetryPolicy};
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

/// Open (creating if absent) the database at `path`, retrying under
/// `policy` while another process holds it locked.
pub fn open_with_retry(path: &Path, policy: &RetryPolicy) -> Result<Connection> {
    let conn = with_retry(policy, "open database", || Connection::open(path))?;
    debug!(path = %path.display(), "database opened");
    Ok(conn)
}
