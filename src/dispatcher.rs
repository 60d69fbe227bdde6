//! Command resolution and execution
//!
//! The [`Registry`] maps operation names to descriptor factories. A command
//! invocation resolves a fresh descriptor, binds the raw flags into it,
//! submits the resulting [`Request`] and, for async operations, waits on the
//! returned job.

use crate::{
    backoff::Backoff,
    client::{Client, JobHandle},
    descriptor::{Descriptor, DescriptorSchema, Request},
    error::{CommandError, Result},
    flags::synthesize,
    poller::{Outcome, Poller},
};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::ffi::OsString;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

struct Entry {
    name: &'static str,
    is_async: bool,
    make: fn() -> Box<dyn Descriptor>,
}

fn make<D: Descriptor + Default + 'static>() -> Box<dyn Descriptor> {
    Box::new(D::default())
}

/// Set of known operations, in registration order
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor type; a second registration of a name is ignored
    pub fn register<D: Descriptor + Default + 'static>(&mut self) -> &mut Self {
        let sample = D::default();
        let name = sample.api_name();
        if self.entries.iter().any(|e| e.name == name) {
            warn!(command = name, "command registered twice, keeping the first");
            return self;
        }
        self.entries.push(Entry {
            name,
            is_async: sample.is_async(),
            make: make::<D>,
        });
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_async(&self, name: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.is_async)
    }

    /// Fresh descriptor for an exact, case-sensitive operation name
    pub fn resolve(&self, name: &str) -> Result<Box<dyn Descriptor>> {
        match self.entries.iter().find(|e| e.name == name) {
            Some(entry) => Ok((entry.make)()),
            None => Err(CommandError::CommandNotFound {
                name: name.to_string(),
                suggestion: self.suggest(name),
            }),
        }
    }

    /// Closest registered name, only used as a hint in error messages
    fn suggest(&self, name: &str) -> Option<String> {
        let matcher = SkimMatcherV2::default();
        self.entries
            .iter()
            .filter_map(|e| matcher.fuzzy_match(e.name, name).map(|score| (score, e.name)))
            .max_by_key(|(score, _)| *score)
            .map(|(_, n)| n.to_string())
    }

    /// Declaration tables of every registered descriptor
    pub fn schemas(&self) -> Vec<DescriptorSchema> {
        self.entries
            .iter()
            .map(|e| DescriptorSchema::of((e.make)().as_mut()))
            .collect()
    }
}

/// Resolve a command and bind its flags
pub fn prepare<I, T>(registry: &Registry, name: &str, args: I) -> Result<Box<dyn Descriptor>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut descriptor = registry.resolve(name)?;
    let flags = synthesize(descriptor.as_mut())?;
    flags.bind(descriptor.as_mut(), args)?;
    Ok(descriptor)
}

/// Knobs for async waiting
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    pub cancel: CancellationToken,
    pub backoff: Backoff,
    pub max_attempts: Option<u32>,
}

/// Submit a populated descriptor and wait for async completion
///
/// Transport errors are returned as they come; nothing is retried here.
/// `options.cancel` aborts the submission as well as the wait.
pub async fn execute<C: Client + ?Sized>(
    descriptor: &mut dyn Descriptor,
    client: &C,
    options: &ExecuteOptions,
) -> Result<Outcome> {
    let request = Request::from_descriptor(descriptor);
    debug!(command = request.command, params = request.params.len(), "submitting");
    let response = tokio::select! {
        biased;
        _ = options.cancel.cancelled() => {
            info!(command = request.command, "cancelled before the API answered");
            return Ok(Outcome::Cancelled { job: None });
        }
        response = client.submit(&request) => response?,
    };

    if !descriptor.is_async() {
        return Ok(Outcome::Completed(response));
    }

    let job = JobHandle::from_response(&response).ok_or(CommandError::MissingJobHandle {
        command: request.command,
    })?;
    debug!(command = request.command, %job, "waiting for job");
    Poller::new(client)
        .with_backoff(options.backoff)
        .with_max_attempts(options.max_attempts)
        .wait(&job, &options.cancel)
        .await
}
