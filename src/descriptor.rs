//! Command descriptors and the artifacts derived from them
//!
//! A descriptor is a plain struct that implements [`Descriptor`] by listing
//! its fields with their metadata. Everything else (flags, request payloads,
//! the declaration table checked by `cs-check`) is derived from that list.

use crate::field::{Field, Kind, Slot};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One remote operation
pub trait Descriptor: fmt::Debug + Send {
    /// Operation name, used as CLI command name and catalog key
    fn api_name(&self) -> &'static str;

    /// Whether the operation returns a job that must be polled
    fn is_async(&self) -> bool {
        false
    }

    /// One-line help text
    fn about(&self) -> &'static str {
        ""
    }

    /// Fields in declaration order
    fn fields(&mut self) -> Vec<Field<'_>>;

    /// Rust type name without its module path
    fn ident(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

/// Field shape as seen by the consistency checker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub ident: String,
    /// Resolved wire name
    pub wire: String,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub doc: String,
    pub kind: Kind,
}

fn default_required() -> bool {
    true
}

/// Reconstructed declaration of one descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorSchema {
    /// Type name, e.g. `ListZones`
    pub name: String,
    /// Operation name, e.g. `listZones`
    #[serde(default)]
    pub api_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl DescriptorSchema {
    /// Capture the declaration table of a descriptor instance
    pub fn of(descriptor: &mut dyn Descriptor) -> Self {
        let name = descriptor.ident().to_string();
        let api_name = Some(descriptor.api_name().to_string());
        let fields = descriptor
            .fields()
            .iter()
            .map(|f| FieldDecl {
                ident: f.meta.ident.to_string(),
                wire: f.meta.wire_name().into_owned(),
                required: f.meta.required,
                doc: f.meta.doc.to_string(),
                kind: f.kind(),
            })
            .collect();
        DescriptorSchema {
            name,
            api_name,
            fields,
        }
    }

    /// Case-insensitive match on the type name or the operation name
    pub fn matches(&self, target: &str) -> bool {
        self.name.eq_ignore_ascii_case(target)
            || self
                .api_name
                .as_deref()
                .is_some_and(|n| n.eq_ignore_ascii_case(target))
    }
}

/// Request payload built from a populated descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub command: &'static str,
    pub params: Map<String, Value>,
}

impl Request {
    /// Encode every field that carries a value
    ///
    /// Required fields are always present. Optional fields are left out while
    /// they hold their zero value. Unsupported fields never contribute.
    pub fn from_descriptor(descriptor: &mut dyn Descriptor) -> Self {
        let command = descriptor.api_name();
        let mut params = Map::new();
        for field in descriptor.fields() {
            let required = field.meta.required;
            let name = field.meta.wire_name().into_owned();
            let value = match field.slot {
                Slot::Bool(v) => (*v || required).then(|| Value::Bool(*v)),
                Slot::I32(v) => (*v != 0 || required).then(|| Value::from(*v)),
                Slot::I64(v) => (*v != 0 || required).then(|| Value::from(*v)),
                Slot::U32(v) => (*v != 0 || required).then(|| Value::from(*v)),
                Slot::U64(v) => (*v != 0 || required).then(|| Value::from(*v)),
                Slot::F64(v) => (*v != 0.0 || required).then(|| Value::from(*v)),
                Slot::String(v) => {
                    (!v.is_empty() || required).then(|| Value::String(v.clone()))
                }
                Slot::Addr(v) => match v {
                    Some(ip) => Some(Value::String(ip.to_string())),
                    None if required => Some(Value::Null),
                    None => None,
                },
                Slot::Strings(v) => (!v.is_empty() || required)
                    .then(|| Value::Array(v.iter().cloned().map(Value::String).collect())),
                Slot::NullableBool(v) => match v {
                    Some(b) => Some(Value::Bool(*b)),
                    None if required => Some(Value::Null),
                    None => None,
                },
                Slot::Unsupported(_) => None,
            };
            if let Some(value) = value {
                params.insert(name, value);
            }
        }
        Request { command, params }
    }

    /// Flatten the payload into query parameters, sequences comma-joined
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .filter_map(|(k, v)| {
                let text = match v {
                    Value::Null => return None,
                    Value::String(s) => s.clone(),
                    Value::Array(items) => items
                        .iter()
                        .map(|i| match i {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join(","),
                    other => other.to_string(),
                };
                Some((k.clone(), text))
            })
            .collect()
    }
}
