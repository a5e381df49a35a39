//! Bounded retry for transient SQLite lock contention.
//!
//! Only `SQLITE_BUSY` / `SQLITE_LOCKED` failures are retried; every other
//! error surfaces immediately. Exhausting the configured attempts yields
//! [`IngestError::Locked`] carrying the final driver error.

use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use tracing::warn;

/// How often and how patiently a contended operation is retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Clamped to at least 1.
    pub max_attempts: u32,
    /// Pause between attempts, in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_ms: 1000,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// Run `op`, retrying under `policy` while it fails with a transient lock.
///
/// `label` names the operation in retry logs.
pub fn with_retry<T, F>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> rusqlite::Result<T>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if is_transient_lock(&err) => {
                if attempt >= max_attempts {
                    return Err(IngestError::Locked {
                        attempts: max_attempts,
                        source: err,
                    });
                }
                warn!(
                    op = label,
                    attempt,
                    max_attempts,
                    delay_ms = policy.delay_ms,
                    "database locked, retrying"
                );
                thread::sleep(Duration::from_millis(policy.delay_ms));
                attempt += 1;
            }
            Err(err) => return Err(IngestError::Storage(err)),
        }
    }
}

fn is_transient_lock(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::DatabaseBusy
                || failure.code == rusqlite::ErrorCode::DatabaseLocked
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy_error() -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".to_string()),
        )
    }

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_attempts(max_attempts)
            .with_delay_ms(0)
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay_ms, 1000);
    }

    #[test]
    fn test_success_runs_once() {
        let mut calls = 0;
        let result = with_retry(&fast(5), "op", || {
            calls += 1;
            Ok(42)
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_recovers_after_transient_lock() {
        let mut calls = 0;
        let result = with_retry(&fast(5), "op", || {
            calls += 1;
            if calls < 3 {
                Err(busy_error())
            } else {
                Ok("done")
            }
        });
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_exhaustion_reports_attempts() {
        let mut calls = 0;
        let result: Result<()> = with_retry(&fast(3), "op", || {
            calls += 1;
            Err(busy_error())
        });
        assert_eq!(calls, 3);
        match result {
            Err(IngestError::Locked { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected Locked, got {other:?}"),
        }
    }

    #[test]
    fn test_non_lock_error_is_not_retried() {
        let mut calls = 0;
        let result: Result<()> = with_retry(&fast(5), "op", || {
            calls += 1;
            Err(rusqlite::Error::InvalidQuery)
        });
        assert_eq!(calls, 1);
        assert!(matches!(result, Err(IngestError::Storage(_))));
    }

    #[test]
    fn test_zero_attempts_clamps_to_one() {
        let mut calls = 0;
        let result: Result<()> = with_retry(&fast(0), "op", || {
            calls += 1;
            Err(busy_error())
        });
        assert_eq!(calls, 1);
        match result {
            Err(IngestError::Locked { attempts, .. }) => assert_eq!(attempts, 1),
            other => panic!("expected Locked, got {other:?}"),
        }
    }
}
