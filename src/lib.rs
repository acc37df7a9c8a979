//! Strict YAML parsing and dumping with a pluggable tag/type converter
//! registry.
//!
//! On top of the `saphyr-parser` scanner this crate adds the safety checks a
//! bare YAML loader lacks: duplicate mapping keys are detected (compared by
//! resolved value) and the ambiguous YAML 1.1 boolean literals (`yes`, `no`,
//! `on`, `off`, ...) are rejected unless quoted. Custom tags are bound to
//! record types through a per-parser registry, with exhaustive field
//! validation on parse and deterministic emission on dump.
//!
//! ```rust
//! use blockyaml::Parser;
//!
//! blockyaml::yaml_record! {
//!     pub struct Date {
//!         month: String,
//!         week: i64,
//!         day: i64 = 0,
//!     }
//! }
//!
//! let mut parser = Parser::new();
//! parser.register_record::<Date>().unwrap();
//!
//! let date: Date = parser.typed().parse_str("!Date\nmonth: June\nweek: 1\n").unwrap();
//! assert_eq!(date.day, 0);
//!
//! // `no` is an error, not false and not a string.
//! assert!(parser.parse_str("no").is_err());
//! ```

pub mod budget;
mod compose;
pub mod convert;
mod emit;
pub mod error;
pub mod location;
mod macros;
pub mod node;
pub mod options;
pub mod parser;
mod quoting;
pub mod record;
pub mod registry;
mod scalars;
mod tags;
pub mod value;

pub use budget::{Budget, BudgetBreach};
pub use convert::{ConstructContext, Converter, RepresentContext};
pub use error::Error;
pub use location::Location;
pub use node::{Node, NodeKind, ScalarStyle};
pub use options::{DuplicateKeyPolicy, Options};
pub use parser::{Parser, TypedParser};
pub use record::{FieldMap, FieldSpec, Record, RecordConverter};
pub use registry::Registry;
pub use value::{CustomValue, FromValue, ToValue, Value};
