//! Session Handler
//!
//! Runs the command loop over a reader/writer pair.

use std::io::{BufRead, ErrorKind, Write};

use crate::engine::Engine;
use crate::error::Result;
use crate::protocol::{decode_command, encode_response, Command, Response};

/// Counters for a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Commands executed (including EXIT)
    pub commands: u64,

    /// Commands answered with `ERR`
    pub errors: u64,

    /// Whether the session ended on `EXIT` rather than end of input
    pub exited: bool,
}

/// Handles one command stream
pub struct Session<'a, R, W> {
    /// Line source (stdin in the binary)
    reader: R,

    /// Response sink (stdout in the binary)
    writer: W,

    /// Engine the commands run against; must already be recovered
    engine: &'a mut Engine,

    summary: SessionSummary,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    /// Create a new session
    pub fn new(engine: &'a mut Engine, reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            engine,
            summary: SessionSummary::default(),
        }
    }

    /// Run the loop until `EXIT` or end of input
    ///
    /// Bad requests and failed writes are answered with `ERR` and the loop
    /// continues. Only failures to read input or write output end the
    /// session with an error; a closed output pipe ends it quietly.
    pub fn run(&mut self) -> Result<SessionSummary> {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if self.reader.read_until(b'\n', &mut buf)? == 0 {
                tracing::debug!("end of input");
                return Ok(self.summary);
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    tracing::debug!(error = %e, "rejected non UTF-8 line");
                    self.summary.errors += 1;
                    if !self.send(&Response::error("invalid UTF-8"))? {
                        return Ok(self.summary);
                    }
                    continue;
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let command = match decode_command(trimmed) {
                Ok(command) => command,
                Err(e) => {
                    tracing::debug!(line = trimmed, error = %e, "rejected command");
                    self.summary.errors += 1;
                    if !self.send(&Response::error(e.to_string()))? {
                        return Ok(self.summary);
                    }
                    continue;
                }
            };

            self.summary.commands += 1;

            if command == Command::Exit {
                tracing::info!("received EXIT, shutting down");
                self.summary.exited = true;
                return Ok(self.summary);
            }

            let response = self.execute(command);
            if !self.send(&response)? {
                return Ok(self.summary);
            }
        }
    }

    /// Execute one command against the engine
    pub fn execute(&mut self, command: Command) -> Response {
        tracing::trace!(?command, "executing");

        match command {
            Command::Set { key, value } => match self.engine.set(&key, &value) {
                Ok(()) => {
                    tracing::debug!(key = %key, "SET ok");
                    Response::Ok
                }
                Err(e) => {
                    tracing::error!(key = %key, error = %e, "SET failed");
                    self.summary.errors += 1;
                    Response::error(e.to_string())
                }
            },
            Command::Get { key } => {
                let value = self.engine.get(&key);
                tracing::debug!(key = %key, found = value.is_some(), "GET");
                Response::from_lookup(value)
            }
            // EXIT is handled by the loop; answering it here keeps execute total.
            Command::Exit => Response::Ok,
        }
    }

    /// Write and flush one response
    ///
    /// Returns `Ok(false)` if the reader of our output has gone away.
    fn send(&mut self, response: &Response) -> Result<bool> {
        let result = self
            .writer
            .write_all(encode_response(response).as_bytes())
            .and_then(|_| self.writer.flush());

        match result {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                tracing::debug!("output closed before response could be sent");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Counters so far
    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Consume the session and return the writer (used by tests)
    pub fn into_writer(self) -> W {
        self.writer
    }
}
