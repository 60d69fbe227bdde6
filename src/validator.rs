//! Descriptor/catalog consistency checking
//!
//! Compares the declaration table of one descriptor with the parameter list
//! the API publishes for the same operation (`listApis`). Every mismatch is
//! reported; nothing is fixed.

use crate::{
    constants::{
        EXIT_BAD_INPUT, EXIT_CATALOG_ENTRY_NOT_FOUND, EXIT_DESCRIPTOR_NOT_FOUND, EXIT_FINDINGS,
    },
    descriptor::{DescriptorSchema, FieldDecl},
    field::Kind,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// One parameter as published by the API
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogParam {
    pub name: String,
    #[serde(rename = "type")]
    pub wire_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

/// One operation as published by the API
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default)]
    pub params: Vec<CatalogParam>,
}

/// The published operation list
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Catalog {
    #[serde(default)]
    pub api: Vec<CatalogEntry>,
}

impl Catalog {
    /// Accepts `{"api": [...]}` as well as the raw `listApis` answer
    /// wrapped in `{"listapisresponse": {...}}`
    pub fn from_json(data: &str) -> Result<Self, ValidateError> {
        let mut value: Value =
            serde_json::from_str(data).map_err(|e| ValidateError::Input(e.to_string()))?;
        if let Some(inner) = value.get_mut("listapisresponse") {
            value = inner.take();
        }
        serde_json::from_value(value).map_err(|e| ValidateError::Input(e.to_string()))
    }

    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.api.iter().find(|a| a.name == name)
    }
}

/// Declaration tables loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Declarations {
    #[serde(default)]
    pub descriptors: Vec<DescriptorSchema>,
}

impl Declarations {
    pub fn from_yaml(data: &str) -> Result<Self, ValidateError> {
        serde_yaml::from_str(data).map_err(|e| ValidateError::Input(e.to_string()))
    }
}

/// Conditions that stop validation before any comparison
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("Definition {0:?} not found. Are you in right place?")]
    DescriptorNotFound(String),

    #[error("Catalog has no entry named {0:?}")]
    CatalogEntryNotFound(String),

    #[error("invalid input: {0}")]
    Input(String),
}

impl ValidateError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::DescriptorNotFound(_) => EXIT_DESCRIPTOR_NOT_FOUND,
            ValidateError::CatalogEntryNotFound(_) => EXIT_CATALOG_ENTRY_NOT_FOUND,
            ValidateError::Input(_) => EXIT_BAD_INPUT,
        }
    }
}

/// One finding
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Catalog parameter with no matching field
    FieldMissing { param: String },
    TypeMismatch {
        param: String,
        expected: &'static str,
        actual: Kind,
    },
    UnknownCatalogType {
        param: String,
        wire_type: String,
        actual: Kind,
    },
    /// Field documentation differs; `expected` is the catalog text
    DocMismatch { param: String, expected: String },
    RequiredMismatch {
        param: String,
        catalog_required: bool,
    },
    /// Field declared locally but absent from the catalog
    OrphanField { field: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::FieldMissing { param } => {
                write!(f, "Field missing: expected to find {param:?}")
            }
            Diagnostic::TypeMismatch {
                param,
                expected,
                actual,
            } => write!(f, "Field {param:?} expected to be {expected}, got {actual}"),
            Diagnostic::UnknownCatalogType {
                param,
                wire_type,
                actual,
            } => write!(f, "Field {param:?}: unknown type: {wire_type:?} <=> {actual}"),
            Diagnostic::DocMismatch { param, expected } => {
                write!(f, "Field {param:?}: use .doc({expected:?})")
            }
            Diagnostic::RequiredMismatch {
                param,
                catalog_required: true,
            } => write!(f, "Field {param:?} is required by the API, drop .optional()"),
            Diagnostic::RequiredMismatch {
                param,
                catalog_required: false,
            } => write!(f, "Field {param:?} is optional in the API, mark it .optional()"),
            Diagnostic::OrphanField { field } => {
                write!(f, "Field {field:?} was defined but doesn't exist")
            }
        }
    }
}

/// Findings for one descriptor, in catalog order then declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticReport {
    pub target: String,
    pub findings: Vec<Diagnostic>,
}

impl DiagnosticReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_clean() {
            0
        } else {
            EXIT_FINDINGS
        }
    }

    pub fn count(&self, pred: impl Fn(&Diagnostic) -> bool) -> usize {
        self.findings.iter().filter(|d| pred(d)).count()
    }
}

/// Acceptable field kinds for a catalog wire type
///
/// `None` when the wire type is unknown.
fn expected_kind(wire_type: &str, actual: Kind) -> Option<Result<(), &'static str>> {
    let ok = match wire_type {
        "integer" => actual == Kind::I32,
        "long" => actual == Kind::I64,
        "boolean" => matches!(actual, Kind::Bool | Kind::NullableBool),
        "string" | "uuid" => actual == Kind::String,
        "map" => actual.is_sequence(),
        _ => return None,
    };
    let expected = match wire_type {
        "integer" => "i32",
        "long" => "i64",
        "boolean" => "bool",
        "map" => "a sequence",
        _ => "string",
    };
    Some(if ok { Ok(()) } else { Err(expected) })
}

/// Diff one descriptor against its catalog entry
pub fn validate(
    declarations: &[DescriptorSchema],
    catalog: &Catalog,
    target: &str,
) -> Result<DiagnosticReport, ValidateError> {
    let schema = declarations
        .iter()
        .find(|d| d.matches(target))
        .ok_or_else(|| ValidateError::DescriptorNotFound(target.to_string()))?;
    let entry = catalog
        .entry(target)
        .ok_or_else(|| ValidateError::CatalogEntryNotFound(target.to_string()))?;

    Ok(compare(schema, entry))
}

/// Field-by-field comparison; never stops early
pub fn compare(schema: &DescriptorSchema, entry: &CatalogEntry) -> DiagnosticReport {
    let mut remaining: Vec<Option<&FieldDecl>> = schema.fields.iter().map(Some).collect();
    let mut findings = Vec::new();

    for param in &entry.params {
        let slot = remaining
            .iter_mut()
            .find(|f| f.is_some_and(|f| f.wire == param.name));
        let Some(field) = slot.and_then(Option::take) else {
            findings.push(Diagnostic::FieldMissing {
                param: param.name.clone(),
            });
            continue;
        };

        match expected_kind(&param.wire_type, field.kind) {
            Some(Ok(())) => {}
            Some(Err(expected)) => findings.push(Diagnostic::TypeMismatch {
                param: param.name.clone(),
                expected,
                actual: field.kind,
            }),
            None => findings.push(Diagnostic::UnknownCatalogType {
                param: param.name.clone(),
                wire_type: param.wire_type.clone(),
                actual: field.kind,
            }),
        }

        if field.required != param.required {
            findings.push(Diagnostic::RequiredMismatch {
                param: param.name.clone(),
                catalog_required: param.required,
            });
        }

        if field.doc != param.description {
            findings.push(Diagnostic::DocMismatch {
                param: param.name.clone(),
                expected: param.description.clone(),
            });
        }
    }

    findings.extend(remaining.into_iter().flatten().map(|f| Diagnostic::OrphanField {
        field: f.wire.clone(),
    }));

    DiagnosticReport {
        target: entry.name.clone(),
        findings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(wire: &str, kind: Kind, required: bool, doc: &str) -> FieldDecl {
        FieldDecl {
            ident: wire.to_uppercase(),
            wire: wire.to_string(),
            required,
            doc: doc.to_string(),
            kind,
        }
    }

    fn param(name: &str, wire_type: &str, required: bool, description: &str) -> CatalogParam {
        CatalogParam {
            name: name.to_string(),
            wire_type: wire_type.to_string(),
            description: description.to_string(),
            required,
        }
    }

    fn schema(fields: Vec<FieldDecl>) -> DescriptorSchema {
        DescriptorSchema {
            name: "ListZones".to_string(),
            api_name: Some("listZones".to_string()),
            fields,
        }
    }

    fn catalog(params: Vec<CatalogParam>) -> Catalog {
        Catalog {
            api: vec![CatalogEntry {
                name: "listZones".to_string(),
                params,
            }],
        }
    }

    #[test]
    fn empty_doc_against_catalog_description() {
        let decls = [schema(vec![decl("zone-id", Kind::String, true, "")])];
        let cat = catalog(vec![param("zone-id", "uuid", true, "Zone UUID")]);
        let report = validate(&decls, &cat, "listZones").unwrap();

        assert_eq!(
            report.findings,
            vec![Diagnostic::DocMismatch {
                param: "zone-id".to_string(),
                expected: "Zone UUID".to_string(),
            }]
        );
        assert_eq!(report.count(|d| matches!(d, Diagnostic::TypeMismatch { .. })), 0);
        assert_eq!(report.count(|d| matches!(d, Diagnostic::OrphanField { .. })), 0);
        assert_eq!(report.exit_code(), EXIT_FINDINGS);
    }

    #[test]
    fn missing_params_do_not_stop_enumeration() {
        let decls = [schema(vec![decl("name", Kind::String, false, "the name")])];
        let cat = catalog(vec![
            param("id", "uuid", false, "the ID"),
            param("page", "integer", false, ""),
            param("name", "string", false, "the name"),
        ]);
        let report = validate(&decls, &cat, "listZones").unwrap();
        let lines: Vec<String> = report.findings.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                r#"Field missing: expected to find "id""#,
                r#"Field missing: expected to find "page""#,
            ]
        );
    }

    #[test]
    fn type_table() {
        let cases = [
            ("integer", Kind::I32, true),
            ("integer", Kind::I64, false),
            ("long", Kind::I64, true),
            ("long", Kind::U64, false),
            ("boolean", Kind::Bool, true),
            ("boolean", Kind::NullableBool, true),
            ("boolean", Kind::String, false),
            ("string", Kind::String, true),
            ("uuid", Kind::String, true),
            ("uuid", Kind::Strings, false),
            ("map", Kind::Strings, true),
            ("map", Kind::Unsupported(crate::field::Container::List), true),
            ("map", Kind::Unsupported(crate::field::Container::Map), false),
        ];
        for (wire_type, kind, ok) in cases {
            let decls = [schema(vec![decl("x", kind, true, "")])];
            let cat = catalog(vec![param("x", wire_type, true, "")]);
            let report = validate(&decls, &cat, "listZones").unwrap();
            assert_eq!(report.is_clean(), ok, "{wire_type} vs {kind}");
        }
    }

    #[test]
    fn mismatch_names_expected_kind() {
        let decls = [schema(vec![decl("page", Kind::I64, true, "")])];
        let cat = catalog(vec![param("page", "integer", true, "")]);
        let report = validate(&decls, &cat, "listZones").unwrap();
        assert_eq!(
            report.findings[0].to_string(),
            r#"Field "page" expected to be i32, got i64"#
        );
    }

    #[test]
    fn unknown_wire_type_is_reported() {
        let decls = [schema(vec![decl("when", Kind::String, true, "")])];
        let cat = catalog(vec![param("when", "date", true, "")]);
        let report = validate(&decls, &cat, "listZones").unwrap();
        assert!(matches!(
            &report.findings[..],
            [Diagnostic::UnknownCatalogType { wire_type, .. }] if wire_type == "date"
        ));
    }

    #[test]
    fn leftover_fields_are_orphans_in_declaration_order() {
        let decls = [schema(vec![
            decl("b", Kind::String, true, ""),
            decl("id", Kind::String, true, ""),
            decl("a", Kind::String, true, ""),
        ])];
        let cat = catalog(vec![param("id", "uuid", true, "")]);
        let report = validate(&decls, &cat, "listZones").unwrap();
        assert_eq!(
            report.findings,
            vec![
                Diagnostic::OrphanField {
                    field: "b".to_string()
                },
                Diagnostic::OrphanField {
                    field: "a".to_string()
                },
            ]
        );
    }

    #[test]
    fn required_drift_is_reported() {
        let decls = [schema(vec![decl("id", Kind::String, false, "")])];
        let cat = catalog(vec![param("id", "uuid", true, "")]);
        let report = validate(&decls, &cat, "listZones").unwrap();
        assert_eq!(
            report.findings,
            vec![Diagnostic::RequiredMismatch {
                param: "id".to_string(),
                catalog_required: true,
            }]
        );
    }

    #[test]
    fn preconditions_have_distinct_exit_codes() {
        let decls = [schema(vec![])];
        let err = validate(&decls, &catalog(vec![]), "listVolumes").unwrap_err();
        assert!(matches!(err, ValidateError::DescriptorNotFound(_)));

        // descriptor lookup ignores case, catalog lookup does not
        let err = validate(&decls, &catalog(vec![]), "LISTZONES").unwrap_err();
        assert!(matches!(err, ValidateError::CatalogEntryNotFound(_)));

        assert_ne!(
            ValidateError::DescriptorNotFound(String::new()).exit_code(),
            ValidateError::CatalogEntryNotFound(String::new()).exit_code()
        );
        assert_ne!(
            ValidateError::CatalogEntryNotFound(String::new()).exit_code(),
            EXIT_FINDINGS
        );
    }

    #[test]
    fn catalog_accepts_raw_list_apis_answer() {
        let raw = r#"{"listapisresponse": {"count": 1, "api": [
            {"name": "listZones", "isasync": false, "params": [
                {"name": "id", "type": "uuid", "description": "the ID of the zone", "required": false}
            ]}
        ]}}"#;
        let cat = Catalog::from_json(raw).unwrap();
        assert_eq!(cat.entry("listZones").unwrap().params[0].wire_type, "uuid");

        let bare = r#"{"api": [{"name": "listZones", "params": []}]}"#;
        assert!(Catalog::from_json(bare).unwrap().entry("listZones").is_some());
        assert!(matches!(
            Catalog::from_json("not json"),
            Err(ValidateError::Input(_))
        ));
    }
}
