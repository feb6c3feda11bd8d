//! Engine Module
//!
//! The storage engine that ties the log and the index together.
//!
//! ## Responsibilities
//! - Own the append-only log and the in-memory index
//! - Rebuild the index from the log exactly once at startup
//! - Persist every write before it becomes visible

use std::path::Path;

use crate::config::Config;
use crate::error::{KvError, Result};
use crate::index::HashIndex;
use crate::log::{AppendLog, LogRecovery, RecoveryResult};

/// The main storage engine
///
/// ## Concurrency Model: single writer, no sharing
///
/// Commands run one at a time to completion, so the engine takes `&mut self`
/// for writes and needs no locks. A crash between the log append and the
/// index update loses nothing: the index is rebuilt from the log on the
/// next start.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Durable source of truth (exclusive file handle)
    log: AppendLog,

    /// Replayed view of the log
    index: HashIndex,

    /// Set once `recover` has run
    recovery: Option<RecoveryResult>,
}

impl Engine {
    /// Open or create an engine with the given config
    ///
    /// The index starts empty; call [`Engine::recover`] before serving
    /// requests, or use [`Engine::start`].
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let log = AppendLog::open(&config.data_file)?;
        let index = HashIndex::with_load_factor(config.initial_capacity, config.max_load_factor);

        tracing::info!(
            path = %config.data_file.display(),
            capacity = index.capacity(),
            "engine opened"
        );

        Ok(Self {
            config,
            log,
            index,
            recovery: None,
        })
    }

    /// Open the engine and replay the log
    pub fn start(config: Config) -> Result<Self> {
        let mut engine = Self::open(config)?;
        engine.recover()?;
        Ok(engine)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified log file
    pub fn start_path(path: &Path) -> Result<Self> {
        Self::start(Config::builder().data_file(path).build())
    }

    /// Rebuild the index by replaying the log
    ///
    /// Must be called exactly once, before any `set`.
    pub fn recover(&mut self) -> Result<RecoveryResult> {
        if self.recovery.is_some() {
            return Err(KvError::AlreadyRecovered);
        }

        let result = LogRecovery::recover(
            &mut self.log,
            &mut self.index,
            self.config.corruption_policy,
        )?;

        self.recovery = Some(result.clone());
        Ok(result)
    }

    /// Store a key/value pair
    ///
    /// Steps:
    /// 1. Append to the log (write, flush, fsync)
    /// 2. Update the index
    ///
    /// If step 1 fails the index is left untouched and the error is returned.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.recovery.is_none() {
            return Err(KvError::NotRecovered);
        }

        self.log.append(key, value)?;
        self.index.put(key.to_string(), value.to_string());

        Ok(())
    }

    /// Look up a key; absence is a normal outcome
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key)
    }

    /// Sync the log before shutdown
    pub fn close(mut self) -> Result<()> {
        self.log.sync()?;
        tracing::info!(keys = self.index.len(), "engine closed");
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if no keys are stored
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Current index capacity
    pub fn capacity(&self) -> usize {
        self.index.capacity()
    }

    /// Read-only view of the index
    pub fn index(&self) -> &HashIndex {
        &self.index
    }

    /// Path of the log file
    pub fn log_path(&self) -> &Path {
        self.log.path()
    }

    /// Outcome of `recover`, if it has run
    pub fn recovery_result(&self) -> Option<&RecoveryResult> {
        self.recovery.as_ref()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
