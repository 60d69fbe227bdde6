//! # cs
//!
//! Command-line client for CloudStack-style cloud APIs.
//!
//! Every API operation known to the client is a command; its flags are
//! generated from the operation's declaration.
//!
//! ## Quick Start
//!
//! ```bash
//! # List zones
//! cs listZones --available
//!
//! # Deploy a VM and wait for the job to finish
//! cs deployVirtualMachine --serviceofferingid ... --templateid ... --zoneid ...
//!
//! # Show the request without sending it
//! cs --dry-run destroyVirtualMachine --id ... --expunge
//! ```
//!
//! ## Configuration
//!
//! Endpoints and credentials are read from `~/.config/cs/profiles.yaml`
//! (or `CS_CONFIG`); pick a profile with `--profile` or `CS_PROFILE`.

use anyhow::Result;
use clap::Parser;
use cs_cli::{
    commands::{self, call::CallOptions},
    descriptors, logging, Cli, Invocation,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::configure_logging(cli.verbose, cli.quiet);

    let registry = descriptors::registry();
    let argv = match cli.invocation {
        Some(Invocation::Call(argv)) if !argv.is_empty() => argv,
        _ => {
            let program = std::env::args().next().unwrap_or_else(|| "cs".to_string());
            eprint!("{}", commands::usage(&program, &registry));
            std::process::exit(1);
        }
    };

    let opts = CallOptions {
        profile: cli.profile,
        config: cli.config,
        dry_run: cli.dry_run,
    };
    let code = commands::call::run(&opts, &registry, &argv[0], &argv[1..]).await?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
