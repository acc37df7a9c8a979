//! Crate error type and its location reporting.

use std::fmt;

use saphyr_parser::ScanError;

use crate::budget::BudgetBreach;
use crate::location::{location_from_scan_error, Location};

/// Error raised while parsing, converting, or emitting YAML.
///
/// Every variant that can point at the source document carries a
/// [`Location`]; [`Error::location`] returns it when known. Parsing is
/// fail-fast: the first detected error aborts the whole document.
#[derive(Debug)]
pub enum Error {
    /// Malformed YAML reported by the underlying scanner, or a structural
    /// problem detected while building the node tree.
    Syntax { msg: String, location: Location },
    /// Two keys in one mapping resolve to the same scalar value.
    DuplicateKey {
        key: String,
        first: Location,
        location: Location,
    },
    /// A YAML 1.1 ambiguous boolean literal (`yes`, `no`, `on`, `off`,
    /// `y`, `n` in any case) appeared unquoted under the strict policy.
    UnsafeBoolean { token: String, location: Location },
    /// A node carries a tag with no registered converter and no built-in
    /// fallback.
    UnknownTag { tag: String, location: Location },
    /// Alias references an anchor id that was never defined.
    UnknownAnchor { id: usize, location: Location },
    /// A record mapping is missing required fields.
    MissingFields {
        record: &'static str,
        fields: Vec<String>,
        location: Location,
    },
    /// A record mapping contains keys that match no declared field.
    UnexpectedFields {
        record: &'static str,
        fields: Vec<String>,
        location: Location,
    },
    /// The constructed value does not have the type the caller asserted.
    TypeAssertion {
        expected: &'static str,
        found: String,
        location: Location,
    },
    /// No converter is registered for the runtime type being represented.
    UnknownType { type_name: &'static str },
    /// A resource budget was exceeded while scanning the input.
    Budget {
        breach: BudgetBreach,
        location: Location,
    },
    /// Invalid converter registration (duplicate tag or duplicate type).
    Registration { msg: String },
    /// I/O failure while reading or writing a file.
    Io { cause: std::io::Error },
    /// Free-form error with optional source location.
    Message { msg: String, location: Location },
}

impl Error {
    /// Construct a `Message` error with no known location.
    pub(crate) fn msg<S: Into<String>>(s: S) -> Self {
        Error::Message {
            msg: s.into(),
            location: Location::UNKNOWN,
        }
    }

    /// Construct a `Syntax` error at the given position.
    pub(crate) fn syntax<S: Into<String>>(s: S, location: Location) -> Self {
        Error::Syntax {
            msg: s.into(),
            location,
        }
    }

    /// Construct a `TypeAssertion` error.
    pub(crate) fn type_assertion(
        expected: &'static str,
        found: impl Into<String>,
        location: Location,
    ) -> Self {
        Error::TypeAssertion {
            expected,
            found: found.into(),
            location,
        }
    }

    /// If the error has a known source location, return it.
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::Syntax { location, .. }
            | Error::DuplicateKey { location, .. }
            | Error::UnsafeBoolean { location, .. }
            | Error::UnknownTag { location, .. }
            | Error::UnknownAnchor { location, .. }
            | Error::MissingFields { location, .. }
            | Error::UnexpectedFields { location, .. }
            | Error::TypeAssertion { location, .. }
            | Error::Budget { location, .. }
            | Error::Message { location, .. } => {
                if location.is_known() {
                    Some(*location)
                } else {
                    None
                }
            }
            Error::UnknownType { .. } | Error::Registration { .. } | Error::Io { .. } => None,
        }
    }

    /// Map a `saphyr_parser::ScanError` into our error type with location.
    pub(crate) fn from_scan_error(err: ScanError) -> Self {
        let location = location_from_scan_error(&err);
        Error::Syntax {
            msg: err.info().to_owned(),
            location,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax { msg, location } => fmt_with_location(f, msg, location),
            Error::DuplicateKey {
                key,
                first,
                location,
            } => {
                let msg = if first.is_known() {
                    format!(
                        "duplicate key `{key}` in mapping (first occurrence at line {}, column {})",
                        first.line, first.column
                    )
                } else {
                    format!("duplicate key `{key}` in mapping")
                };
                fmt_with_location(f, &msg, location)
            }
            Error::UnsafeBoolean { token, location } => fmt_with_location(
                f,
                &format!(
                    "unsafe boolean `{token}`: use `true` or `false`, \
                     or quote the value if it is meant to be a string"
                ),
                location,
            ),
            Error::UnknownTag { tag, location } => fmt_with_location(
                f,
                &format!(
                    "tag `{tag}` has no registered converter; quote the value \
                     if it is meant to be a string, otherwise register a converter"
                ),
                location,
            ),
            Error::UnknownAnchor { id, location } => fmt_with_location(
                f,
                &format!("alias references unknown anchor id {id}"),
                location,
            ),
            Error::MissingFields {
                record,
                fields,
                location,
            } => fmt_with_location(
                f,
                &format!(
                    "record `{record}`: missing required field(s) `{}`",
                    fields.join("`, `")
                ),
                location,
            ),
            Error::UnexpectedFields {
                record,
                fields,
                location,
            } => fmt_with_location(
                f,
                &format!(
                    "record `{record}`: unexpected field(s) `{}`",
                    fields.join("`, `")
                ),
                location,
            ),
            Error::TypeAssertion {
                expected,
                found,
                location,
            } => fmt_with_location(
                f,
                &format!("expected {expected}, got {found}"),
                location,
            ),
            Error::UnknownType { type_name } => write!(
                f,
                "type `{type_name}` has no registered converter and no built-in representation"
            ),
            Error::Budget { breach, location } => {
                fmt_with_location(f, &format!("YAML budget breached: {breach:?}"), location)
            }
            Error::Registration { msg } => write!(f, "registration error: {msg}"),
            Error::Io { cause } => write!(f, "IO error: {cause}"),
            Error::Message { msg, location } => fmt_with_location(f, msg, location),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { cause } => Some(cause),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(cause: std::io::Error) -> Self {
        Error::Io { cause }
    }
}

/// Print a message optionally suffixed with "at line X, column Y".
fn fmt_with_location(f: &mut fmt::Formatter<'_>, msg: &str, location: &Location) -> fmt::Result {
    if location.is_known() {
        write!(f, "{msg} at line {}, column {}", location.line, location.column)
    } else {
        write!(f, "{msg}")
    }
}
