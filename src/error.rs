//! Error types for the command layer

use crate::client::TransportError;
use thiserror::Error;

/// Everything that can stop a command invocation
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{name} is not a known command{}", suggestion_hint(.suggestion))]
    CommandNotFound {
        name: String,
        suggestion: Option<String>,
    },

    /// Descriptor metadata is malformed. Always a programming error.
    #[error("descriptor {descriptor} cannot be bound: {reason}")]
    BindingPrecondition {
        descriptor: &'static str,
        reason: String,
    },

    /// Bad flags on the command line, or a help request
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{command} is asynchronous but the response carried no job id")]
    MissingJobHandle { command: &'static str },

    #[error("job {job} failed with code {code}: {text}")]
    PollFailed { job: String, code: i64, text: String },

    #[error("job {job} still pending after {attempts} status queries")]
    PollExhausted { job: String, attempts: u32 },
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean {s}?)"),
        None => String::new(),
    }
}

pub type Result<T, E = CommandError> = std::result::Result<T, E>;
