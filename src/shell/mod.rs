//! Shell Module
//!
//! Drives an engine from a line-oriented input stream.
//!
//! ## Architecture
//! - One session per process, reading stdin and writing stdout
//! - One command at a time, run to completion before the next is read
//! - `EXIT` or end of input ends the session; the engine never sees `EXIT`

mod session;

pub use session::{Session, SessionSummary};
