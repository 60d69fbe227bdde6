//! Waiting on asynchronous jobs
//!
//! The poller sleeps `delay(attempt)` before every status query, starting at
//! attempt 0, so queries are spaced 0s, 1s, 1s, 2s, 3s, ... apart. Only a
//! pending status is retried.

use crate::{
    backoff::Backoff,
    client::{Client, JobHandle, JobStatus},
    error::{CommandError, Result},
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Final state of a command invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed(Value),
    /// Aborted before a result arrived. `job` is set when the operation had
    /// already been accepted and may still be running.
    Cancelled { job: Option<JobHandle> },
}

pub struct Poller<'a, C: Client + ?Sized> {
    client: &'a C,
    backoff: Backoff,
    max_attempts: Option<u32>,
}

impl<'a, C: Client + ?Sized> Poller<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Poller {
            client,
            backoff: Backoff::default(),
            max_attempts: None,
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Stop after this many status queries
    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Query the job until it resolves or `cancel` fires
    pub async fn wait(&self, job: &JobHandle, cancel: &CancellationToken) -> Result<Outcome> {
        let mut attempt: u32 = 0;
        loop {
            if self.max_attempts.is_some_and(|max| attempt >= max) {
                return Err(CommandError::PollExhausted {
                    job: job.to_string(),
                    attempts: attempt,
                });
            }

            if cancel.is_cancelled() {
                return Ok(cancelled(job));
            }
            let delay = self.backoff.delay(attempt);
            if !delay.is_zero() {
                debug!(%job, attempt, ?delay, "job pending, waiting");
                tokio::select! {
                    _ = cancel.cancelled() => return Ok(cancelled(job)),
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            if cancel.is_cancelled() {
                return Ok(cancelled(job));
            }
            match self.client.query_status(job).await? {
                JobStatus::Pending => attempt = attempt.saturating_add(1),
                JobStatus::Succeeded(result) => {
                    debug!(%job, attempt, "job succeeded");
                    return Ok(Outcome::Completed(result));
                }
                JobStatus::Failed { code, text } => {
                    return Err(CommandError::PollFailed {
                        job: job.to_string(),
                        code,
                        text,
                    });
                }
            }
        }
    }
}

fn cancelled(job: &JobHandle) -> Outcome {
    info!(%job, "stopped waiting for job");
    Outcome::Cancelled {
        job: Some(job.clone()),
    }
}
