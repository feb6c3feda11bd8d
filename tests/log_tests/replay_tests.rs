//! Tests for log replay
//!
//! These tests verify:
//! - Empty and clean logs
//! - Torn tails (missing trailing newline) end replay without error
//! - Malformed lines in the middle are skipped, or fatal under the strict policy
//! - The iterator is one-shot and fused

use std::fs::{self, File};
use std::path::PathBuf;

use tallykv::log::{Record, Replay, ReplayStats};
use tallykv::{CorruptionPolicy, KvError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_log(contents: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("data.db");
    fs::write(&log_path, contents).unwrap();
    (temp_dir, log_path)
}

fn open_replay(path: &PathBuf, policy: CorruptionPolicy) -> Replay {
    Replay::new(File::open(path).unwrap(), policy)
}

fn record(key: &str, value: &str) -> Record {
    Record::new(key, value).unwrap()
}

// =============================================================================
// Clean Log Tests
// =============================================================================

#[test]
fn test_replay_empty_file() {
    let (_temp, path) = write_log(b"");
    let mut replay = open_replay(&path, CorruptionPolicy::Skip);

    assert!(replay.next().is_none());
    assert_eq!(replay.stats(), ReplayStats::default());
    assert_eq!(replay.valid_len(), 0);
}

#[test]
fn test_replay_clean_file() {
    let (_temp, path) = write_log(b"SET a 1\nSET b 2\nSET a 3\n");
    let mut replay = open_replay(&path, CorruptionPolicy::Skip);

    let records: Vec<Record> = replay.by_ref().map(|r| r.unwrap()).collect();

    assert_eq!(records, vec![record("a", "1"), record("b", "2"), record("a", "3")]);
    assert_eq!(replay.stats().records, 3);
    assert_eq!(replay.stats().torn_bytes, 0);
    assert_eq!(replay.valid_len(), 24);
}

// =============================================================================
// Torn Tail Tests
// =============================================================================

#[test]
fn test_replay_stops_at_torn_tail() {
    let (_temp, path) = write_log(b"SET a 1\nSET b 2\nSET c");
    let mut replay = open_replay(&path, CorruptionPolicy::Skip);

    let records: Vec<Record> = replay.by_ref().map(|r| r.unwrap()).collect();

    assert_eq!(records, vec![record("a", "1"), record("b", "2")]);
    assert_eq!(replay.stats().torn_bytes, 5);
    assert_eq!(replay.valid_len(), 16);
}

#[test]
fn test_complete_record_without_newline_is_torn() {
    // The newline is the commit marker; without it the record never finished.
    let (_temp, path) = write_log(b"SET a 1\nSET b 2");
    let mut replay = open_replay(&path, CorruptionPolicy::Fail);

    let records: Vec<Record> = replay.by_ref().map(|r| r.unwrap()).collect();

    assert_eq!(records, vec![record("a", "1")]);
    assert_eq!(replay.stats().torn_bytes, 7);
}

#[test]
fn test_torn_tail_is_not_an_error_under_fail_policy() {
    let (_temp, path) = write_log(b"SET a 1\nSE");
    let replay = open_replay(&path, CorruptionPolicy::Fail);

    let results: Vec<_> = replay.collect();
    assert_eq!(results.len(), 1);
    assert!(results[0].is_ok());
}

#[test]
fn test_torn_tail_of_binary_garbage() {
    let (_temp, path) = write_log(b"SET a 1\n\x00\x00\x00\xFF");
    let mut replay = open_replay(&path, CorruptionPolicy::Skip);

    assert_eq!(replay.next().unwrap().unwrap(), record("a", "1"));
    assert!(replay.next().is_none());
    assert_eq!(replay.stats().torn_bytes, 4);
    assert_eq!(replay.stats().skipped, 0);
}

// =============================================================================
// Mid-Log Corruption Tests
// =============================================================================

#[test]
fn test_malformed_middle_line_is_skipped() {
    let (_temp, path) = write_log(b"SET a 1\ngarbage line here\nSET b 2\n");
    let mut replay = open_replay(&path, CorruptionPolicy::Skip);

    let records: Vec<Record> = replay.by_ref().map(|r| r.unwrap()).collect();

    assert_eq!(records, vec![record("a", "1"), record("b", "2")]);
    assert_eq!(replay.stats().skipped, 1);
    assert_eq!(replay.stats().records, 2);
    assert_eq!(replay.stats().torn_bytes, 0);
}

#[test]
fn test_blank_middle_line_is_skipped() {
    let (_temp, path) = write_log(b"SET a 1\n\nSET b 2\n");
    let mut replay = open_replay(&path, CorruptionPolicy::Skip);

    let count = replay.by_ref().filter(|r| r.is_ok()).count();

    assert_eq!(count, 2);
    assert_eq!(replay.stats().skipped, 1);
}

#[test]
fn test_malformed_middle_line_fails_under_fail_policy() {
    let (_temp, path) = write_log(b"SET a 1\nSET b\nSET c 3\n");
    let mut replay = open_replay(&path, CorruptionPolicy::Fail);

    assert_eq!(replay.next().unwrap().unwrap(), record("a", "1"));

    match replay.next() {
        Some(Err(KvError::MalformedRecord { line, .. })) => assert_eq!(line, 2),
        other => panic!("expected MalformedRecord, got {:?}", other),
    }

    // Fused after the error
    assert!(replay.next().is_none());
}

// =============================================================================
// One-Shot Tests
// =============================================================================

#[test]
fn test_replay_is_fused() {
    let (_temp, path) = write_log(b"SET a 1\n");
    let mut replay = open_replay(&path, CorruptionPolicy::Skip);

    assert!(replay.next().is_some());
    assert!(replay.next().is_none());
    assert!(replay.next().is_none());
    assert_eq!(replay.stats().records, 1);
}
