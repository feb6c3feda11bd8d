//! # TallyKV
//!
//! A minimal durable key-value store with:
//! - An append-only log, fsynced before every write is acknowledged
//! - Crash recovery that replays the log and drops a torn tail
//! - A hand-rolled open-addressing hash index (linear probing)
//! - A line-oriented `SET` / `GET` / `EXIT` command shell
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Shell (stdin → stdout)                      │
//! │              one command at a time                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ set / get
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Engine                               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │ set: 1. append          │ set: 2. put / get
//!          ▼                         ▼
//!   ┌─────────────┐  replay   ┌─────────────┐
//!   │  AppendLog  │ ────────▶ │  HashIndex  │
//!   │  (data.db)  │ at start  │ (in memory) │
//!   └─────────────┘           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod log;
pub mod index;
pub mod protocol;
pub mod shell;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::{Config, CorruptionPolicy};
pub use engine::Engine;
pub use index::HashIndex;
pub use log::{AppendLog, Record, RecoveryResult};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of TallyKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
