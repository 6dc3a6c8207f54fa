//! Command execution errors.
//!
//! Command strings stored here are already redacted.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid command line: {0}")]
    InvalidCommandLine(String),

    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command '{command}' exited with status {code}")]
    Failed { command: String, code: i32 },

    #[error("command '{command}' was terminated by a signal")]
    Terminated { command: String },
}

pub type CommandResult<T> = std::result::Result<T, CommandError>;
