//! Configuration for TallyKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{KvError, Result};
use crate::index::{DEFAULT_CAPACITY, DEFAULT_MAX_LOAD_FACTOR};

/// Main configuration for a TallyKV engine
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Log Configuration
    // -------------------------------------------------------------------------
    /// Path of the append-only log. Parent directories are created on open.
    pub data_file: PathBuf,

    /// What replay does with a malformed line that is not the torn tail
    pub corruption_policy: CorruptionPolicy,

    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Initial slot count (rounded up to a power of two)
    pub initial_capacity: usize,

    /// Occupied / capacity ratio above which the index grows
    pub max_load_factor: f64,
}

/// Handling of malformed lines found before the end of the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptionPolicy {
    /// Skip the line, count it and log a warning
    #[default]
    Skip,

    /// Stop replay with `KvError::MalformedRecord`
    Fail,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data.db"),
            corruption_policy: CorruptionPolicy::Skip,
            initial_capacity: DEFAULT_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the index cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(KvError::Config(
                "initial_capacity must be at least 1".to_string(),
            ));
        }

        // A load factor of 1.0 or more lets the table fill up, which breaks probing.
        if !(self.max_load_factor > 0.0 && self.max_load_factor < 1.0) {
            return Err(KvError::Config(format!(
                "max_load_factor must be in (0, 1), got {}",
                self.max_load_factor
            )));
        }

        if self.data_file.as_os_str().is_empty() {
            return Err(KvError::Config("data_file must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the log file path
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    /// Set the mid-log corruption policy
    pub fn corruption_policy(mut self, policy: CorruptionPolicy) -> Self {
        self.config.corruption_policy = policy;
        self
    }

    /// Set the initial index capacity
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Set the load factor that triggers index growth
    pub fn max_load_factor(mut self, load_factor: f64) -> Self {
        self.config.max_load_factor = load_factor;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
