//! Command definitions
//!
//! Represents commands read from the input stream.

use std::fmt;

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Set,
    Get,
    Exit,
}

impl CommandType {
    /// Keyword as written on the wire
    pub fn keyword(&self) -> &'static str {
        match self {
            CommandType::Set => "SET",
            CommandType::Get => "GET",
            CommandType::Exit => "EXIT",
        }
    }

    /// Number of arguments after the keyword
    pub fn arity(&self) -> usize {
        match self {
            CommandType::Set => 2,
            CommandType::Get => 1,
            CommandType::Exit => 0,
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Store a key/value pair
    Set { key: String, value: String },

    /// Look up a key
    Get { key: String },

    /// End the session
    Exit,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Set { .. } => CommandType::Set,
            Command::Get { .. } => CommandType::Get,
            Command::Exit => CommandType::Exit,
        }
    }
}
