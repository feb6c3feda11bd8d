//! Log reader
//!
//! Lazy, one-shot replay of the records in a log file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::iter::FusedIterator;

use crate::config::CorruptionPolicy;
use crate::error::{KvError, Result};

use super::Record;

/// Counters gathered while replaying
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Well-formed records yielded
    pub records: u64,

    /// Complete but malformed lines that were skipped
    pub skipped: u64,

    /// Bytes after the last newline (torn tail), 0 if the file ends cleanly
    pub torn_bytes: u64,
}

/// Iterator over the records of a log, in file order
///
/// Yields `Ok(record)` per well-formed line and stops at end of file or at
/// a torn tail. `Err` is only produced for read failures, or for a
/// malformed line under `CorruptionPolicy::Fail`; the iterator is finished
/// after any error.
pub struct Replay {
    /// Buffered reader positioned at the next unread line
    reader: BufReader<File>,

    /// What to do with a malformed complete line
    policy: CorruptionPolicy,

    /// 1-based number of the last complete line read
    line_no: u64,

    /// Byte offset just past the last complete line
    valid_len: u64,

    stats: ReplayStats,

    done: bool,
}

impl Replay {
    /// Start replaying `file` from its current position (expected: the start)
    pub fn new(file: File, policy: CorruptionPolicy) -> Self {
        Self {
            reader: BufReader::new(file),
            policy,
            line_no: 0,
            valid_len: 0,
            stats: ReplayStats::default(),
            done: false,
        }
    }

    /// Counters so far; final once the iterator returns `None`
    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    /// Length of the file up to and including the last complete line
    pub fn valid_len(&self) -> u64 {
        self.valid_len
    }

    fn read_next(&mut self) -> Result<Option<Record>> {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let n = self.reader.read_until(b'\n', &mut buf)?;

            if n == 0 {
                return Ok(None);
            }

            if buf.last() != Some(&b'\n') {
                // Crash mid-append: everything after the last newline is discarded.
                self.stats.torn_bytes = n as u64;
                tracing::warn!(
                    line = self.line_no + 1,
                    bytes = n,
                    "torn record at end of log, stopping replay"
                );
                return Ok(None);
            }

            self.line_no += 1;
            self.valid_len += n as u64;

            match Record::decode(&buf[..n - 1]) {
                Ok(record) => {
                    self.stats.records += 1;
                    return Ok(Some(record));
                }
                Err(reason) => match self.policy {
                    CorruptionPolicy::Skip => {
                        self.stats.skipped += 1;
                        tracing::warn!(line = self.line_no, %reason, "skipping malformed record");
                    }
                    CorruptionPolicy::Fail => {
                        return Err(KvError::MalformedRecord {
                            line: self.line_no,
                            reason,
                        });
                    }
                },
            }
        }
    }
}

impl Iterator for Replay {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_next() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Replay {}
