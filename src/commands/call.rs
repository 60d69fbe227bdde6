use crate::{
    client::HttpClient,
    config::{config_path, load_config},
    constants::EXIT_CANCELLED,
    descriptor::Request,
    dispatcher::{execute, prepare, ExecuteOptions, Registry},
    error::CommandError,
    poller::Outcome,
};
use anyhow::{Context, Result};
use std::{path::PathBuf, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Options of the top-level `cs` invocation that affect one API call
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub profile: Option<String>,
    pub config: Option<PathBuf>,
    pub dry_run: bool,
}

/// Run one API command, returning the process exit status
pub async fn run(
    opts: &CallOptions,
    registry: &Registry,
    name: &str,
    args: &[String],
) -> Result<i32> {
    let mut descriptor = match prepare(registry, name, args) {
        Ok(d) => d,
        // clap prints the help or the flag error itself
        Err(CommandError::Usage(e)) => e.exit(),
        Err(e) => return Err(e.into()),
    };

    if opts.dry_run {
        let request = Request::from_descriptor(descriptor.as_mut());
        println!("{} (async={})", name, descriptor.is_async());
        println!("{}", serde_json::to_string_pretty(&request.params)?);
        return Ok(0);
    }

    let path = opts.config.clone().unwrap_or_else(config_path);
    let cfg = load_config(&path)?;
    let profile = cfg.profile(opts.profile.as_deref())?;
    let client = HttpClient::new(profile)
        .with_context(|| format!("building client for profile '{}'", profile.name))?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });
    if let Some(secs) = profile.poll_timeout {
        let on_deadline = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            on_deadline.cancel();
        });
    }

    let options = ExecuteOptions {
        cancel,
        ..Default::default()
    };
    match execute(descriptor.as_mut(), &client, &options).await? {
        Outcome::Completed(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(0)
        }
        Outcome::Cancelled { job: Some(job) } => {
            warn!(%job, "gave up waiting; the job may still complete on the server");
            eprintln!("{name}: cancelled while waiting for job {job}");
            Ok(EXIT_CANCELLED)
        }
        Outcome::Cancelled { job: None } => {
            eprintln!("{name}: cancelled before the API answered");
            Ok(EXIT_CANCELLED)
        }
    }
}
