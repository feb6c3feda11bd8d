//! Protocol Module
//!
//! Line-oriented command protocol spoken on stdin/stdout.
//!
//! ## Requests
//! ```text
//! SET <key> <value>
//! GET <key>
//! EXIT
//! ```
//! Command words are case-insensitive; tokens are separated by whitespace.
//!
//! ## Responses
//! - `OK`             - SET committed
//! - `<value>`        - GET hit
//! - `NULL`           - GET miss
//! - `ERR <message>`  - bad request or failed write

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::Response;
pub use codec::{decode_command, encode_response};
