//! Public macros: option construction and record declaration.
//!
//! `options!` exists to keep call sites ergonomic while allowing the crate
//! to evolve [`Options`](crate::Options) over time without breaking
//! changes. `yaml_record!` declares a struct together with the field table
//! its converter validates against.

/// Construct [`crate::Options`] from `Default` and a list of field
/// assignments.
///
/// ```rust
/// use blockyaml::DuplicateKeyPolicy;
///
/// let options = blockyaml::options! {
///     duplicate_keys: DuplicateKeyPolicy::LastWins,
///     strict_booleans: false,
/// };
/// ```
#[macro_export]
macro_rules! options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::Options::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}

/// Declare a record type convertible to and from a tagged YAML mapping.
///
/// The body is ordinary struct syntax, with an optional `= default` after a
/// field type marking the field optional on parse. The macro emits the
/// struct (with `Clone`, `Debug`, `PartialEq` derived) and implements
/// [`Record`](crate::Record) plus the value conversions, so the type can be
/// registered with [`Parser::register_record`](crate::Parser::register_record):
///
/// ```rust
/// use blockyaml::Parser;
///
/// blockyaml::yaml_record! {
///     pub struct Date {
///         month: String,
///         week: i64,
///         day: i64 = 0,
///     }
/// }
///
/// let mut parser = Parser::new();
/// parser.register_record::<Date>().unwrap();
///
/// let date: Date = parser.typed().parse_str("!Date\nmonth: June\nweek: 1\n").unwrap();
/// assert_eq!(date, Date { month: "June".into(), week: 1, day: 0 });
/// ```
#[macro_export]
macro_rules! yaml_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty $(= $default:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::Record for $name {
            fn record_name() -> &'static str {
                stringify!($name)
            }

            fn field_specs() -> &'static [$crate::FieldSpec] {
                const SPECS: &[$crate::FieldSpec] = &[
                    $(
                        $crate::FieldSpec {
                            name: stringify!($field),
                            required: $crate::__record_required!($($default)?),
                        },
                    )*
                ];
                SPECS
            }

            fn construct_fields(
                fields: &mut $crate::FieldMap<'_>,
                ctx: &$crate::ConstructContext<'_>,
            ) -> ::std::result::Result<Self, $crate::Error> {
                ::std::result::Result::Ok(Self {
                    $(
                        $field: $crate::__record_field!(fields, ctx, $field, $fty $(, $default)?),
                    )*
                })
            }

            fn represent_fields(
                &self,
                ctx: &$crate::RepresentContext<'_>,
            ) -> ::std::result::Result<
                ::std::vec::Vec<(&'static str, $crate::Node)>,
                $crate::Error,
            > {
                ::std::result::Result::Ok(::std::vec![
                    $(
                        (stringify!($field), ctx.represent(&self.$field)?),
                    )*
                ])
            }
        }

        impl $crate::FromValue for $name {
            fn expected() -> &'static str {
                stringify!($name)
            }

            fn from_value(
                value: $crate::Value,
                location: $crate::Location,
            ) -> ::std::result::Result<Self, $crate::Error> {
                match value {
                    $crate::Value::Custom(custom) => match custom.downcast::<$name>() {
                        ::std::result::Result::Ok(record) => ::std::result::Result::Ok(record),
                        ::std::result::Result::Err(custom) => {
                            ::std::result::Result::Err($crate::value::__type_mismatch(
                                stringify!($name),
                                &$crate::Value::Custom(custom),
                                location,
                            ))
                        }
                    },
                    other => ::std::result::Result::Err($crate::value::__type_mismatch(
                        stringify!($name),
                        &other,
                        location,
                    )),
                }
            }
        }

        impl $crate::ToValue for $name {
            fn to_value(&self) -> $crate::Value {
                $crate::Value::Custom($crate::CustomValue::new(self.clone()))
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_required {
    () => {
        true
    };
    ($default:expr) => {
        false
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_field {
    ($fields:ident, $ctx:ident, $field:ident, $fty:ty) => {
        $fields.take::<$fty>(stringify!($field), $ctx)?
    };
    ($fields:ident, $ctx:ident, $field:ident, $fty:ty, $default:expr) => {
        $fields.take_or::<$fty>(stringify!($field), $ctx, || $default)?
    };
}
