//! Protocol codec
//!
//! Parsing of request lines and rendering of response lines.

use crate::error::{KvError, Result};

use super::{Command, CommandType, Response};

/// Decode one request line
///
/// Leading and trailing whitespace is ignored and the command word is
/// case-insensitive. Blank lines are the caller's business: they decode to
/// a protocol error here.
pub fn decode_command(line: &str) -> Result<Command> {
    let mut tokens = line.split_whitespace();

    let keyword = tokens
        .next()
        .ok_or_else(|| KvError::Protocol("empty command".to_string()))?;

    let command_type = match keyword.to_ascii_uppercase().as_str() {
        "SET" => CommandType::Set,
        "GET" => CommandType::Get,
        "EXIT" => CommandType::Exit,
        _ => {
            return Err(KvError::Protocol(format!(
                "unknown command: {}",
                keyword
            )))
        }
    };

    let args: Vec<&str> = tokens.collect();
    if args.len() != command_type.arity() {
        return Err(KvError::Protocol(format!(
            "{} expects {} argument(s), got {}",
            command_type,
            command_type.arity(),
            args.len()
        )));
    }

    let command = match command_type {
        CommandType::Set => Command::Set {
            key: args[0].to_string(),
            value: args[1].to_string(),
        },
        CommandType::Get => Command::Get {
            key: args[0].to_string(),
        },
        CommandType::Exit => Command::Exit,
    };

    Ok(command)
}

/// Encode a response as one newline-terminated line
pub fn encode_response(response: &Response) -> String {
    let mut line = response.to_string();
    line.push('\n');
    line
}
