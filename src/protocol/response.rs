//! Response definitions
//!
//! Represents responses written back for each command.

use std::fmt;

/// A response to a single command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Write committed
    Ok,

    /// Value found by GET
    Value(String),

    /// Key not found by GET
    Null,

    /// Request rejected or write failed
    Error(String),
}

impl Response {
    /// Create an ERROR response
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error(message.into())
    }

    /// Build the GET response for an optional value
    pub fn from_lookup(value: Option<&str>) -> Self {
        match value {
            Some(value) => Response::Value(value.to_string()),
            None => Response::Null,
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok => f.write_str("OK"),
            Response::Value(value) => f.write_str(value),
            Response::Null => f.write_str("NULL"),
            Response::Error(message) => write!(f, "ERR {}", message),
        }
    }
}
