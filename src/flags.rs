//! Flag synthesis
//!
//! Turns a descriptor's field list into a clap [`Command`] and writes parsed
//! values back into the descriptor. Each [`Kind`] maps to a [`Binder`] in
//! [`binder`]; kinds without a binder are skipped with an info log line.
//!
//! ```
//! use cs_cli::descriptors::zone::ListZones;
//! use cs_cli::flags::synthesize;
//!
//! let mut zones = ListZones::default();
//! let flags = synthesize(&mut zones).unwrap();
//! flags.bind(&mut zones, ["--name", "ch-gva-2", "--available"]).unwrap();
//! assert_eq!(zones.name, "ch-gva-2");
//! assert_eq!(zones.available, Some(true));
//! ```

use crate::{
    descriptor::Descriptor,
    error::{CommandError, Result},
    field::{parse_bool, Kind, Slot, TriState},
};
use clap::{parser::ValueSource, value_parser, Arg, ArgAction, ArgMatches, Command};
use std::{collections::HashSet, ffi::OsString, net::IpAddr};
use tracing::debug;

/// Externally visible shape of one synthesized flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    pub name: String,
    pub kind: Kind,
    /// Display form of the value a field gets when the flag is absent
    pub default: &'static str,
    pub description: String,
    pub required: bool,
}

/// Parser synthesized for one descriptor type
#[derive(Debug, Clone)]
pub struct FlagSet {
    command: Command,
    flags: Vec<FlagSpec>,
    skipped: Vec<String>,
    preserved: Vec<String>,
}

/// How one kind is registered on the parser and assigned back
struct Binder {
    register: fn(Arg) -> Arg,
    assign: fn(&ArgMatches, &str, Slot<'_>),
    default: &'static str,
}

fn binder(kind: Kind) -> Option<Binder> {
    let binder = match kind {
        Kind::Bool => Binder {
            register: register_bool,
            assign: assign_bool,
            default: "false",
        },
        Kind::I32 => Binder {
            register: |arg| {
                arg.allow_negative_numbers(true)
                    .value_parser(value_parser!(i32))
            },
            assign: assign_i32,
            default: "0",
        },
        Kind::I64 => Binder {
            register: |arg| {
                arg.allow_negative_numbers(true)
                    .value_parser(value_parser!(i64))
            },
            assign: assign_i64,
            default: "0",
        },
        Kind::U32 => Binder {
            register: |arg| arg.value_parser(value_parser!(u32)),
            assign: assign_u32,
            default: "0",
        },
        Kind::U64 => Binder {
            register: |arg| arg.value_parser(value_parser!(u64)),
            assign: assign_u64,
            default: "0",
        },
        Kind::F64 => Binder {
            register: |arg| {
                arg.allow_negative_numbers(true)
                    .value_parser(value_parser!(f64))
            },
            assign: assign_f64,
            default: "0",
        },
        Kind::String => Binder {
            register: |arg| arg.value_parser(value_parser!(String)),
            assign: assign_string,
            default: "",
        },
        Kind::Addr => Binder {
            register: |arg| arg.value_parser(value_parser!(IpAddr)),
            assign: assign_addr,
            default: "",
        },
        Kind::Strings => Binder {
            register: |arg| {
                arg.action(ArgAction::Append)
                    .value_delimiter(',')
                    .value_parser(value_parser!(String))
            },
            assign: assign_strings,
            default: "[]",
        },
        Kind::NullableBool => Binder {
            register: register_nullable_bool,
            assign: assign_nullable_bool,
            default: "unset",
        },
        Kind::Unsupported(_) => return None,
    };
    Some(binder)
}

/// `--flag` or `--flag=<bool>`
fn register_bool(arg: Arg) -> Arg {
    arg.num_args(0..=1)
        .require_equals(true)
        .default_missing_value("true")
        .value_parser(parse_bool)
}

fn register_nullable_bool(arg: Arg) -> Arg {
    arg.num_args(0..=1)
        .require_equals(true)
        .default_missing_value("true")
        .value_parser(|s: &str| s.parse::<TriState>())
}

macro_rules! scalar_assign {
    ($($name:ident: $variant:ident => $ty:ty),* $(,)?) => {
        $(
            fn $name(matches: &ArgMatches, id: &str, slot: Slot<'_>) {
                if let Slot::$variant(v) = slot {
                    *v = matches.get_one::<$ty>(id).copied().unwrap_or_default();
                }
            }
        )*
    };
}

scalar_assign! {
    assign_bool: Bool => bool,
    assign_i32: I32 => i32,
    assign_i64: I64 => i64,
    assign_u32: U32 => u32,
    assign_u64: U64 => u64,
    assign_f64: F64 => f64,
}

fn assign_string(matches: &ArgMatches, id: &str, slot: Slot<'_>) {
    if let Slot::String(v) = slot {
        *v = matches.get_one::<String>(id).cloned().unwrap_or_default();
    }
}

fn assign_addr(matches: &ArgMatches, id: &str, slot: Slot<'_>) {
    if let Slot::Addr(v) = slot {
        if let Some(ip) = matches.get_one::<IpAddr>(id) {
            *v = Some(*ip);
        }
    }
}

fn assign_strings(matches: &ArgMatches, id: &str, slot: Slot<'_>) {
    if let Slot::Strings(v) = slot {
        *v = matches
            .get_many::<String>(id)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
    }
}

fn assign_nullable_bool(matches: &ArgMatches, id: &str, slot: Slot<'_>) {
    if let Slot::NullableBool(v) = slot {
        if matches.value_source(id) == Some(ValueSource::CommandLine) {
            if let Some(state) = matches.get_one::<TriState>(id) {
                *v = state.0;
            }
        }
    }
}

/// Build the parser for a descriptor
///
/// Fails only when the descriptor's metadata is malformed: empty,
/// duplicated or reserved flag names.
pub fn synthesize(descriptor: &mut dyn Descriptor) -> Result<FlagSet> {
    let api_name = descriptor.api_name();
    let mut command = Command::new(api_name)
        .about(descriptor.about())
        .no_binary_name(true);
    let mut flags = Vec::new();
    let mut skipped = Vec::new();
    let mut preserved = Vec::new();
    let mut seen = HashSet::new();

    for field in descriptor.fields() {
        let name = field.meta.wire_name().into_owned();
        let precondition = |reason: String| CommandError::BindingPrecondition {
            descriptor: api_name,
            reason,
        };
        if name.is_empty() || name == "help" {
            return Err(precondition(format!(
                "field {} has an unusable flag name '{}'",
                field.meta.ident, name
            )));
        }
        if !seen.insert(name.clone()) {
            return Err(precondition(format!("flag '{name}' is declared twice")));
        }

        let kind = field.kind();
        let Some(kind_binder) = binder(kind) else {
            debug!(
                command = api_name,
                field = field.meta.ident,
                %kind,
                "[SKIP] field kind is not supported"
            );
            skipped.push(name);
            continue;
        };

        if let Slot::Addr(current) = &field.slot {
            if matches!(**current, Some(ip) if !ip.is_unspecified()) {
                debug!(command = api_name, flag = %name, "keeping preset address");
                preserved.push(name);
                continue;
            }
        }

        let description = field.meta.description();
        let arg = Arg::new(name.clone())
            .long(name.clone())
            .help(description.clone());
        command = command.arg((kind_binder.register)(arg));
        flags.push(FlagSpec {
            name,
            kind,
            default: kind_binder.default,
            description,
            required: field.meta.required,
        });
    }

    Ok(FlagSet {
        command,
        flags,
        skipped,
        preserved,
    })
}

impl FlagSet {
    /// Parse raw flag tokens (without the command name) into the descriptor
    pub fn bind<I, T>(&self, descriptor: &mut dyn Descriptor, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let api_name = descriptor.api_name();
        if api_name != self.command.get_name() {
            return Err(CommandError::BindingPrecondition {
                descriptor: api_name,
                reason: format!("parser was built for {}", self.command.get_name()),
            });
        }

        let matches = self.command.clone().try_get_matches_from(args)?;
        for field in descriptor.fields() {
            let name = field.meta.wire_name();
            let Some(spec) = self.flags.iter().find(|f| f.name == name) else {
                continue;
            };
            if spec.kind != field.kind() {
                return Err(CommandError::BindingPrecondition {
                    descriptor: api_name,
                    reason: format!("field {} changed kind", field.meta.ident),
                });
            }
            if let Some(kind_binder) = binder(spec.kind) {
                (kind_binder.assign)(&matches, &spec.name, field.slot);
            }
        }
        Ok(())
    }

    /// Registered flags, in declaration order
    pub fn schema(&self) -> &[FlagSpec] {
        &self.flags
    }

    /// Flags of fields whose kind could not be bound
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Address flags left out because the field already held an address
    pub fn preserved(&self) -> &[String] {
        &self.preserved
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn render_help(&self) -> String {
        self.command.clone().render_help().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Container, Field};
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[derive(Debug, Default)]
    struct Everything {
        flag: bool,
        small: i32,
        big: i64,
        count: u32,
        huge: u64,
        ratio: f64,
        name: String,
        address: Option<IpAddr>,
        ids: Vec<String>,
        maybe: Option<bool>,
    }

    impl Descriptor for Everything {
        fn api_name(&self) -> &'static str {
            "doEverything"
        }

        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("Flag", &mut self.flag).optional(),
                Field::new("Small", &mut self.small).wire("small-int"),
                Field::new("Big", &mut self.big).optional(),
                Field::new("Count", &mut self.count).optional(),
                Field::new("Huge", &mut self.huge).optional(),
                Field::new("Ratio", &mut self.ratio).optional(),
                Field::new("Name", &mut self.name).doc("a name"),
                Field::new("Address", &mut self.address).wire("ipaddress").optional(),
                Field::new("IDs", &mut self.ids).optional(),
                Field::new("Maybe", &mut self.maybe).optional(),
                Field::unsupported("Details", Container::Map).optional(),
                Field::unsupported("Tags", Container::List).optional(),
            ]
        }
    }

    #[derive(Debug, Default)]
    struct Broken {
        a: String,
        b: String,
    }

    impl Descriptor for Broken {
        fn api_name(&self) -> &'static str {
            "broken"
        }

        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("A", &mut self.a).wire("same"),
                Field::new("B", &mut self.b).wire("same"),
            ]
        }
    }

    #[test]
    fn binds_every_supported_kind() {
        let mut d = Everything::default();
        let flags = synthesize(&mut d).unwrap();
        flags
            .bind(
                &mut d,
                [
                    "--flag",
                    "--small-int",
                    "-7",
                    "--big=9000000000",
                    "--count",
                    "3",
                    "--huge",
                    "18446744073709551615",
                    "--ratio",
                    "0.5",
                    "--name",
                    "web",
                    "--ipaddress",
                    "10.1.1.1",
                    "--ids",
                    "a,b",
                    "--ids",
                    "c",
                    "--maybe=false",
                ],
            )
            .unwrap();

        assert!(d.flag);
        assert_eq!(d.small, -7);
        assert_eq!(d.big, 9_000_000_000);
        assert_eq!(d.count, 3);
        assert_eq!(d.huge, u64::MAX);
        assert_eq!(d.ratio, 0.5);
        assert_eq!(d.name, "web");
        assert_eq!(d.address, Some(IpAddr::V4(Ipv4Addr::new(10, 1, 1, 1))));
        assert_eq!(d.ids, vec!["a", "b", "c"]);
        assert_eq!(d.maybe, Some(false));
    }

    #[test]
    fn defaults_apply_when_flags_are_absent() {
        let mut d = Everything {
            small: 5,
            name: "preset".to_string(),
            ..Default::default()
        };
        let flags = synthesize(&mut d).unwrap();
        flags.bind(&mut d, Vec::<String>::new()).unwrap();
        assert!(!d.flag);
        assert_eq!(d.small, 0);
        assert_eq!(d.name, "");
        assert!(d.ids.is_empty());
        assert_eq!(d.maybe, None);
        assert_eq!(TriState::from(d.maybe).to_string(), "unset");
    }

    #[test]
    fn nullable_bool_set_explicitly() {
        let mut d = Everything::default();
        let flags = synthesize(&mut d).unwrap();
        flags.bind(&mut d, ["--maybe=true"]).unwrap();
        assert_eq!(d.maybe, Some(true));

        let mut d = Everything::default();
        flags.bind(&mut d, ["--maybe"]).unwrap();
        assert_eq!(d.maybe, Some(true));
    }

    #[test]
    fn unsupported_kinds_are_skipped_not_fatal() {
        let mut d = Everything::default();
        let flags = synthesize(&mut d).unwrap();
        assert_eq!(flags.skipped(), ["details", "tags"]);
        assert!(flags.schema().iter().all(|f| f.name != "details"));
        assert!(flags.bind(&mut d, ["--details", "x"]).is_err());
    }

    #[test]
    fn preset_address_is_not_overridden() {
        let preset = IpAddr::V4(Ipv4Addr::new(192, 168, 0, 10));
        let mut d = Everything {
            address: Some(preset),
            ..Default::default()
        };
        let flags = synthesize(&mut d).unwrap();
        assert_eq!(flags.preserved(), ["ipaddress"]);
        assert!(flags.schema().iter().all(|f| f.name != "ipaddress"));

        flags.bind(&mut d, ["--name", "x"]).unwrap();
        assert_eq!(d.address, Some(preset));
    }

    #[test]
    fn unspecified_address_still_gets_a_flag() {
        for zero in [
            IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        ] {
            let mut d = Everything {
                address: Some(zero),
                ..Default::default()
            };
            let flags = synthesize(&mut d).unwrap();
            assert!(flags.schema().iter().any(|f| f.name == "ipaddress"));
            flags.bind(&mut d, ["--ipaddress", "::1"]).unwrap();
            assert_eq!(d.address, Some(IpAddr::V6(Ipv6Addr::LOCALHOST)));
        }
    }

    #[test]
    fn synthesis_is_idempotent() {
        let first = synthesize(&mut Everything::default()).unwrap();
        let second = synthesize(&mut Everything::default()).unwrap();
        assert_eq!(first.schema(), second.schema());

        let ids = |f: &FlagSet| {
            f.command()
                .get_arguments()
                .map(|a| a.get_id().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn schema_carries_names_defaults_and_framing() {
        let flags = synthesize(&mut Everything::default()).unwrap();
        let by_name = |n: &str| flags.schema().iter().find(|f| f.name == n).unwrap();

        assert_eq!(by_name("flag").default, "false");
        assert_eq!(by_name("flag").description, "");
        assert_eq!(by_name("small-int").description, "required");
        assert_eq!(by_name("name").description, "[required] a name");
        assert_eq!(by_name("maybe").default, "unset");
        assert!(!by_name("ids").required);
        assert!(flags.render_help().contains("--small-int"));
    }

    #[test]
    fn bad_values_are_usage_errors() {
        let mut d = Everything::default();
        let flags = synthesize(&mut d).unwrap();
        let err = flags.bind(&mut d, ["--count", "-1"]).unwrap_err();
        assert!(matches!(err, CommandError::Usage(_)));
        let err = flags.bind(&mut d, ["--maybe=perhaps"]).unwrap_err();
        assert!(matches!(err, CommandError::Usage(_)));
    }

    #[test]
    fn duplicate_flag_names_violate_precondition() {
        let err = synthesize(&mut Broken::default()).unwrap_err();
        assert!(matches!(err, CommandError::BindingPrecondition { .. }));
    }

    #[test]
    fn parser_is_tied_to_its_descriptor() {
        let flags = synthesize(&mut Everything::default()).unwrap();
        let err = flags
            .bind(&mut Broken::default(), Vec::<String>::new())
            .unwrap_err();
        assert!(matches!(err, CommandError::BindingPrecondition { .. }));
    }
}
