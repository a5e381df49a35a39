//! SQLite access: connection acquisition, lock retry, and row writing.

mod connect;
mod retry;
mod writer;

pub use connect::open_with_retry;
pub use retry::{with_retry, RetryPolicy};
pub use writer::RowWriter;
