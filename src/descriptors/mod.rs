//! Built-in command descriptors

use crate::{descriptor::Descriptor, dispatcher::Registry, field::Field};

pub mod vm;
pub mod zone;

/// Retrieves the result of an asynchronous job
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QueryAsyncJobResult {
    pub job_id: String,
}

impl Descriptor for QueryAsyncJobResult {
    fn api_name(&self) -> &'static str {
        "queryAsyncJobResult"
    }

    fn about(&self) -> &'static str {
        "Retrieves the current status of asynchronous job."
    }

    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![Field::new("JobID", &mut self.job_id).doc("the ID of the asychronous job")]
    }
}

/// Lists all available APIs, the catalog `cs-check` consumes
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListApis {
    pub name: String,
}

impl Descriptor for ListApis {
    fn api_name(&self) -> &'static str {
        "listApis"
    }

    fn about(&self) -> &'static str {
        "lists all available apis on the server, provided by the Api Discovery plugin"
    }

    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![Field::new("Name", &mut self.name)
            .optional()
            .doc("API name")]
    }
}

/// Registry of every built-in command
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register::<ListApis>()
        .register::<QueryAsyncJobResult>()
        .register::<zone::ListZones>()
        .register::<vm::ListVirtualMachines>()
        .register::<vm::DeployVirtualMachine>()
        .register::<vm::DestroyVirtualMachine>()
        .register::<vm::StartVirtualMachine>()
        .register::<vm::StopVirtualMachine>()
        .register::<vm::RebootVirtualMachine>();
    registry
}
