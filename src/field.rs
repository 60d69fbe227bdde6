//! Field metadata model
//!
//! Every parameter of a descriptor is exposed as a [`Field`]: static metadata
//! ([`FieldMeta`]) plus a mutable [`Slot`] pointing at the storage inside the
//! descriptor. The slot variant determines the field's [`Kind`], which is what
//! the flag synthesizer dispatches on and what the validator compares against
//! the API catalog.

use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::{borrow::Cow, fmt, net::IpAddr, str::FromStr};

/// Closed set of field kinds understood by the command layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr, SerializeDisplay)]
pub enum Kind {
    Bool,
    I32,
    I64,
    U32,
    U64,
    F64,
    String,
    /// Network address stored as `Option<IpAddr>`
    Addr,
    /// Sequence of strings (`Vec<String>`)
    Strings,
    /// Tri-state boolean (`Option<bool>`)
    NullableBool,
    /// Anything the synthesizer cannot bind
    Unsupported(Container),
}

/// Shape of a field the synthesizer does not bind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// Sequence of records, e.g. `Vec<ResourceTag>`
    List,
    /// Key/value map
    Map,
    /// Any other type
    Opaque,
}

impl Kind {
    /// Whether values of this kind are sequences on the wire
    pub fn is_sequence(&self) -> bool {
        matches!(self, Kind::Strings | Kind::Unsupported(Container::List))
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Kind::Unsupported(_))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Bool => "bool",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::F64 => "f64",
            Kind::String => "string",
            Kind::Addr => "addr",
            Kind::Strings => "strings",
            Kind::NullableBool => "nullable-bool",
            Kind::Unsupported(Container::List) => "list",
            Kind::Unsupported(Container::Map) => "map",
            Kind::Unsupported(Container::Opaque) => "opaque",
        };
        f.write_str(name)
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "bool" => Kind::Bool,
            "i32" => Kind::I32,
            "i64" => Kind::I64,
            "u32" => Kind::U32,
            "u64" => Kind::U64,
            "f64" => Kind::F64,
            "string" => Kind::String,
            "addr" => Kind::Addr,
            "strings" => Kind::Strings,
            "nullable-bool" => Kind::NullableBool,
            "list" => Kind::Unsupported(Container::List),
            "map" => Kind::Unsupported(Container::Map),
            "opaque" => Kind::Unsupported(Container::Opaque),
            other => return Err(format!("unknown field kind '{other}'")),
        })
    }
}

/// Declarative metadata attached to one descriptor field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMeta {
    /// Rust-side identifier, e.g. `ZoneID`
    pub ident: &'static str,
    /// Name used on the wire and in the catalog
    pub wire: Option<&'static str>,
    pub required: bool,
    pub doc: &'static str,
}

impl FieldMeta {
    /// Externally visible name: the wire name, or the lower-cased identifier
    pub fn wire_name(&self) -> Cow<'static, str> {
        match self.wire {
            Some(wire) if !wire.is_empty() => Cow::Borrowed(wire),
            _ => Cow::Owned(self.ident.to_lowercase()),
        }
    }

    /// Help text shown next to the flag
    ///
    /// `"required"` alone, `"[required] <doc>"`, or just `<doc>`.
    pub fn description(&self) -> String {
        match (self.required, self.doc.is_empty()) {
            (true, true) => "required".to_string(),
            (true, false) => format!("[required] {}", self.doc),
            (false, _) => self.doc.to_string(),
        }
    }
}

/// Mutable view onto the storage of one field
#[derive(Debug)]
pub enum Slot<'a> {
    Bool(&'a mut bool),
    I32(&'a mut i32),
    I64(&'a mut i64),
    U32(&'a mut u32),
    U64(&'a mut u64),
    F64(&'a mut f64),
    String(&'a mut String),
    Addr(&'a mut Option<IpAddr>),
    Strings(&'a mut Vec<String>),
    NullableBool(&'a mut Option<bool>),
    Unsupported(Container),
}

impl Slot<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Slot::Bool(_) => Kind::Bool,
            Slot::I32(_) => Kind::I32,
            Slot::I64(_) => Kind::I64,
            Slot::U32(_) => Kind::U32,
            Slot::U64(_) => Kind::U64,
            Slot::F64(_) => Kind::F64,
            Slot::String(_) => Kind::String,
            Slot::Addr(_) => Kind::Addr,
            Slot::Strings(_) => Kind::Strings,
            Slot::NullableBool(_) => Kind::NullableBool,
            Slot::Unsupported(c) => Kind::Unsupported(*c),
        }
    }
}

macro_rules! impl_slot_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a mut $ty> for Slot<'a> {
                fn from(value: &'a mut $ty) -> Self {
                    Slot::$variant(value)
                }
            }
        )*
    };
}

impl_slot_from! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    f64 => F64,
    String => String,
    Option<IpAddr> => Addr,
    Vec<String> => Strings,
    Option<bool> => NullableBool,
}

/// One descriptor field: metadata plus a borrowed storage slot
///
/// Built with a small builder so declarations read like annotations:
///
/// ```
/// use cs_cli::field::Field;
///
/// let mut zone = String::new();
/// let field = Field::new("ZoneID", &mut zone)
///     .wire("zoneid")
///     .optional()
///     .doc("the ID of the zone");
/// assert_eq!(field.meta.wire_name(), "zoneid");
/// assert!(!field.meta.required);
/// ```
#[derive(Debug)]
pub struct Field<'a> {
    pub meta: FieldMeta,
    pub slot: Slot<'a>,
}

impl<'a> Field<'a> {
    pub fn new(ident: &'static str, slot: impl Into<Slot<'a>>) -> Self {
        Field {
            meta: FieldMeta {
                ident,
                wire: None,
                required: true,
                doc: "",
            },
            slot: slot.into(),
        }
    }

    /// A field whose type the synthesizer cannot bind (records, maps, ...)
    pub fn unsupported(ident: &'static str, container: Container) -> Self {
        Field {
            meta: FieldMeta {
                ident,
                wire: None,
                required: true,
                doc: "",
            },
            slot: Slot::Unsupported(container),
        }
    }

    pub fn wire(mut self, wire: &'static str) -> Self {
        self.meta.wire = Some(wire);
        self
    }

    pub fn optional(mut self) -> Self {
        self.meta.required = false;
        self
    }

    pub fn doc(mut self, doc: &'static str) -> Self {
        self.meta.doc = doc;
        self
    }

    pub fn kind(&self) -> Kind {
        self.slot.kind()
    }
}

/// Settable tri-state boolean used by nullable-bool flags
///
/// Parses the spellings of [`parse_bool`] and renders `"unset"` until a
/// value has been assigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriState(pub Option<bool>);

impl FromStr for TriState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_bool(s).map(|b| TriState(Some(b)))
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(true) => f.write_str("true"),
            Some(false) => f.write_str("false"),
            None => f.write_str("unset"),
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        TriState(value)
    }
}

/// Boolean text parser accepting `1 t T TRUE true True` and their false twins
pub fn parse_bool(s: &str) -> Result<bool, String> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(format!("invalid boolean value '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_name_defaults_to_lowercased_ident() {
        let mut v = String::new();
        let f = Field::new("DisplayName", &mut v);
        assert_eq!(f.meta.wire_name(), "displayname");

        let mut v = String::new();
        let f = Field::new("DisplayName", &mut v).wire("display-name");
        assert_eq!(f.meta.wire_name(), "display-name");
    }

    #[test]
    fn description_framing() {
        let mut v = 0i64;
        let f = Field::new("Size", &mut v);
        assert_eq!(f.meta.description(), "required");

        let mut v = 0i64;
        let f = Field::new("Size", &mut v).doc("disk size in GB");
        assert_eq!(f.meta.description(), "[required] disk size in GB");

        let mut v = 0i64;
        let f = Field::new("Size", &mut v).optional().doc("disk size in GB");
        assert_eq!(f.meta.description(), "disk size in GB");
        assert!(!f.meta.description().contains("required"));
    }

    #[test]
    fn slot_kinds_follow_storage_type() {
        let mut a: Option<IpAddr> = None;
        let mut b: Option<bool> = None;
        let mut c: Vec<String> = Vec::new();
        assert_eq!(Field::new("A", &mut a).kind(), Kind::Addr);
        assert_eq!(Field::new("B", &mut b).kind(), Kind::NullableBool);
        assert_eq!(Field::new("C", &mut c).kind(), Kind::Strings);
        assert_eq!(
            Field::unsupported("Tags", Container::List).kind(),
            Kind::Unsupported(Container::List)
        );
    }

    #[test]
    fn kind_text_form_is_reversible() {
        for kind in [
            Kind::Bool,
            Kind::U64,
            Kind::NullableBool,
            Kind::Unsupported(Container::Map),
        ] {
            assert_eq!(kind.to_string().parse::<Kind>().unwrap(), kind);
        }
        assert!("float".parse::<Kind>().is_err());
    }

    #[test]
    fn tristate_display() {
        assert_eq!(TriState::default().to_string(), "unset");
        assert_eq!("T".parse::<TriState>().unwrap(), TriState(Some(true)));
        assert_eq!("0".parse::<TriState>().unwrap().to_string(), "false");
        assert!("yes".parse::<TriState>().is_err());
    }
}
