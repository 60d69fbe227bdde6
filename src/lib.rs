//! # cs CLI Library
//!
//! Core library functionality for the `cs` cloud-API client.
//!
//! Every remote operation is declared once as a [`descriptor::Descriptor`].
//! The command-line parser ([`flags`]), the request payload
//! ([`descriptor::Request`]) and the async job wait ([`poller`]) are all
//! derived from that declaration; [`validator`] checks declarations against
//! the catalog the API publishes about itself.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod backoff;
pub mod client;
pub mod commands;
pub mod config;
pub mod constants;
pub mod descriptor;
pub mod descriptors;
pub mod dispatcher;
pub mod error;
pub mod field;
pub mod flags;
pub mod logging;
pub mod poller;
pub mod validator;

/// Command-line client for CloudStack-style cloud APIs
///
/// Every API command is available as `cs <command> [--flag value ...]`; the
/// flags of each command are generated from its declaration.
#[derive(Parser, Debug)]
#[command(
    name = "cs",
    version,
    about = "Command-line client for CloudStack-style cloud APIs",
    long_about = "Command-line client for CloudStack-style cloud APIs.\n\nRun `cs <command> --help` to see the flags of one API command.",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Profile to use from the profiles file
    #[arg(long, env = "CS_PROFILE")]
    pub profile: Option<String>,

    /// Path of the profiles file
    #[arg(long, env = "CS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the request instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub invocation: Option<Invocation>,
}

#[derive(Subcommand, Debug)]
pub enum Invocation {
    /// API command name followed by its flags
    #[command(external_subcommand)]
    Call(Vec<String>),
}
