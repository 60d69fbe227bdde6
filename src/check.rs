//! # cs-check
//!
//! Compares a command declaration with the parameter list the API publishes
//! for it and reports every drift: missing fields, wrong types, stale docs,
//! required-ness and fields the API does not know.
//!
//! ```bash
//! cs listApis > catalog.json
//! cs-check --cmd deployVirtualMachine catalog.json
//! ```

use clap::Parser;
use cs_cli::{commands::check, logging};

fn main() {
    let args = check::CheckArgs::parse();
    logging::configure_logging(args.verbose, false);
    std::process::exit(check::run(&args));
}
