//! Append-Only Log Module
//!
//! Durable, ordered record storage. The log is the only source of truth;
//! the index is rebuilt from it on every start.
//!
//! ## Responsibilities
//! - Append one record per `SET`, fsynced before the write is acknowledged
//! - Replay records in file order as a one-shot iterator
//! - Detect and discard a torn trailing line left by a crash
//! - Skip (or reject) malformed lines in the middle of the file
//!
//! ## File Format
//! ```text
//! SET <key> <value>\n
//! SET <key> <value>\n
//! SET <key> <val          <- torn tail (no newline): dropped on recovery
//! ```
//! Keys and values are single tokens: non-empty, no whitespace, no newline.

mod record;
mod writer;
mod reader;
mod recovery;

pub use record::{validate_token, Record, SET_TAG};
pub use writer::AppendLog;
pub use reader::{Replay, ReplayStats};
pub use recovery::{LogRecovery, RecoveryResult};
