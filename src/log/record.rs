//! Log record definitions
//!
//! A record is one `SET <key> <value>\n` line.

use crate::error::{KvError, Result};

/// Tag that starts every record line
pub const SET_TAG: &str = "SET";

/// A single key/value pair stored in the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub value: String,
}

impl Record {
    /// Create a record, rejecting keys or values that would not survive the line format
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let value = value.into();
        validate_token("key", &key)?;
        validate_token("value", &value)?;
        Ok(Self { key, value })
    }

    /// Serialize into one newline-terminated line
    pub fn encode(&self) -> Vec<u8> {
        encode_line(&self.key, &self.value)
    }

    /// Parse one line with its trailing newline already stripped
    ///
    /// Returns a human-readable reason on failure; replay decides whether
    /// that becomes an error.
    pub fn decode(line: &[u8]) -> std::result::Result<Self, String> {
        let line = std::str::from_utf8(line).map_err(|e| format!("invalid UTF-8: {}", e))?;

        let mut fields = line.split(' ');
        let (tag, key, value) = match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(tag), Some(key), Some(value), None) => (tag, key, value),
            _ => return Err(format!("expected 3 fields, got {:?}", line)),
        };

        if tag != SET_TAG {
            return Err(format!("unknown tag {:?}", tag));
        }
        if !is_token(key) {
            return Err(format!("bad key {:?}", key));
        }
        if !is_token(value) {
            return Err(format!("bad value {:?}", value));
        }

        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Serialize a key/value pair without building a `Record`
pub(crate) fn encode_line(key: &str, value: &str) -> Vec<u8> {
    let mut line = Vec::with_capacity(SET_TAG.len() + key.len() + value.len() + 3);
    line.extend_from_slice(SET_TAG.as_bytes());
    line.push(b' ');
    line.extend_from_slice(key.as_bytes());
    line.push(b' ');
    line.extend_from_slice(value.as_bytes());
    line.push(b'\n');
    line
}

/// Check that `token` can be stored as a key or value
///
/// `what` names the field in the error message.
pub fn validate_token(what: &str, token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(KvError::InvalidToken(format!("{} must not be empty", what)));
    }
    if !is_token(token) {
        return Err(KvError::InvalidToken(format!(
            "{} {:?} must not contain whitespace",
            what, token
        )));
    }
    Ok(())
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(char::is_whitespace)
}
