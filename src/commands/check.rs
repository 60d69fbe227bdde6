use crate::{
    descriptors::registry,
    validator::{validate, Catalog, Declarations, ValidateError},
};
use clap::Parser;
use std::{fs, path::PathBuf};
use tracing::debug;

/// Cross-check command declarations against the API catalog
///
/// Exit status: 0 when the declaration matches, 1 when findings were
/// reported, 2 when the declaration is unknown, 3 when the catalog has no
/// entry for the command, 4 on unreadable input.
#[derive(Parser, Debug)]
#[command(name = "cs-check", version)]
pub struct CheckArgs {
    /// Command to check, e.g. listZones
    #[arg(long)]
    pub cmd: String,

    /// YAML declaration tables to check instead of the built-in commands
    #[arg(long)]
    pub declarations: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Catalog JSON, as returned by `cs listApis`
    pub catalog: PathBuf,
}

/// Run the check, printing findings on stderr; returns the exit status
pub fn run(args: &CheckArgs) -> i32 {
    match check(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            e.exit_code()
        }
    }
}

fn check(args: &CheckArgs) -> Result<i32, ValidateError> {
    let read = |path: &PathBuf| {
        fs::read_to_string(path)
            .map_err(|e| ValidateError::Input(format!("{}: {e}", path.display())))
    };

    let declarations = match &args.declarations {
        Some(path) => Declarations::from_yaml(&read(path)?)?.descriptors,
        None => registry().schemas(),
    };
    debug!(count = declarations.len(), "loaded declarations");
    let catalog = Catalog::from_json(&read(&args.catalog)?)?;

    let report = validate(&declarations, &catalog, &args.cmd)?;
    for finding in &report.findings {
        eprintln!("{finding}");
    }
    println!(
        "{}: {} finding(s)",
        report.target,
        report.findings.len()
    );
    Ok(report.exit_code())
}
