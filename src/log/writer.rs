//! Append-only log writer
//!
//! Owns the log file for the lifetime of the engine.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::CorruptionPolicy;
use crate::error::Result;

use super::record::{encode_line, validate_token};
use super::Replay;

/// Durable, append-only record store backed by a single file
///
/// The file is opened in append mode, so every write lands at the current
/// end of file. The handle is released when the log is dropped.
pub struct AppendLog {
    /// Path to the log file
    path: PathBuf,

    /// Append-mode handle
    file: File,

    /// Length of the file up to the last committed record
    committed_len: u64,
}

impl AppendLog {
    /// Open or create the log at `path`
    ///
    /// Missing parent directories are created.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let committed_len = file.metadata()?.len();

        tracing::debug!(path = %path.display(), bytes = committed_len, "log opened");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            committed_len,
        })
    }

    /// Append one record and force it to the device
    ///
    /// Returns only after the write, flush and sync have all completed. On
    /// failure the record must not be treated as committed; any bytes that
    /// made it to the file are cut off again so the next append starts on a
    /// clean line.
    pub fn append(&mut self, key: &str, value: &str) -> Result<()> {
        validate_token("key", key)?;
        validate_token("value", value)?;

        let line = encode_line(key, value);

        if let Err(e) = self.write_durably(&line) {
            tracing::error!(key, error = %e, "log append failed");
            self.rollback();
            return Err(e.into());
        }

        self.committed_len += line.len() as u64;
        tracing::debug!(key, bytes = line.len(), "record appended");

        Ok(())
    }

    fn write_durably(&mut self, line: &[u8]) -> std::io::Result<()> {
        self.file.write_all(line)?;
        self.file.flush()?;
        self.file.sync_all()
    }

    /// Best-effort removal of a partially written record
    fn rollback(&mut self) {
        let result = self
            .file
            .set_len(self.committed_len)
            .and_then(|_| self.file.sync_all());

        if let Err(e) = result {
            // Replay will still treat a torn tail as end-of-log.
            tracing::warn!(error = %e, "could not roll back partial append");
        }
    }

    /// Replay every record from the start of the file
    ///
    /// The file is created empty if it has disappeared since `open`.
    pub fn replay(&self, policy: CorruptionPolicy) -> Result<Replay> {
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;

        Ok(Replay::new(file, policy))
    }

    /// Cut the file back to `valid_len` bytes and sync
    ///
    /// Used after replay to drop a torn trailing line, so later appends do
    /// not get glued onto it.
    pub fn discard_tail(&mut self, valid_len: u64) -> Result<()> {
        self.file.set_len(valid_len)?;
        self.file.sync_all()?;
        self.committed_len = valid_len;

        tracing::debug!(bytes = valid_len, "log tail discarded");

        Ok(())
    }

    /// Force a sync of the file and its metadata
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Bytes of committed records
    pub fn len_bytes(&self) -> u64 {
        self.committed_len
    }

    /// Path to the log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
