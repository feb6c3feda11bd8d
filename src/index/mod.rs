//! Index Module
//!
//! In-memory key → value index rebuilt from the log at startup.
//!
//! ## Responsibilities
//! - Exact-match lookups and last-write-wins updates
//! - Keep the load factor under the configured bound
//! - Never hold durable truth: the log is the source of truth
//!
//! ## Data Structure Choice
//! A flat slot array with open addressing and linear probing:
//! - Slots are either `Empty` or `Occupied` (no deletes, so no tombstones)
//! - Capacity is a power of two, so `hash mod capacity` is a mask
//! - Growth doubles the array and re-inserts every occupied slot
//!
//! ```text
//!   home = hash(key) & (capacity - 1)
//!   ┌─────┬─────┬─────┬─────┬─────┬─────┬─────┬─────┐
//!   │  E  │ k3  │  E  │ k1  │ k2  │  E  │  E  │ k4  │
//!   └─────┴─────┴─────┴─────┴─────┴─────┴─────┴──┬──┘
//!      ▲                                         │
//!      └──────────── probe wraps to 0 ───────────┘
//! ```

mod table;

pub use table::HashIndex;

/// Initial slot count when none is configured
pub const DEFAULT_CAPACITY: usize = 16;

/// Occupied / capacity ratio above which the index grows
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.7;
