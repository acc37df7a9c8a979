//! The structured-record converter.
//!
//! A record type declares its fields once (via [`yaml_record!`]); the
//! declaration is compiled into a [`FieldSpec`] table at registration time
//! and [`RecordConverter`] validates every mapping against it from both
//! sides: all required fields present, no fields that were never declared.
//! Field values are constructed recursively through the registry, so nested
//! records and custom-tagged content work without extra wiring.
//!
//! [`yaml_record!`]: crate::yaml_record

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::convert::{ConstructContext, Converter, RepresentContext};
use crate::error::Error;
use crate::location::Location;
use crate::node::Node;
use crate::value::{FromValue, ToValue};

/// Declared shape of one record field.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    /// False when the declaration carries a default value.
    pub required: bool,
}

/// A type declared with [`yaml_record!`](crate::yaml_record): a plain
/// struct plus the derived field table and conversion glue.
pub trait Record:
    Any + fmt::Debug + Clone + PartialEq + ToValue + FromValue + Send + Sync + Sized
{
    /// The declared name, from which the `!Name` tag is derived.
    fn record_name() -> &'static str;

    /// The field table, in declaration order.
    fn field_specs() -> &'static [FieldSpec];

    /// Build the record from validated fields, applying declared defaults.
    fn construct_fields(
        fields: &mut FieldMap<'_>,
        ctx: &ConstructContext<'_>,
    ) -> Result<Self, Error>;

    /// Represent every field in declaration order. Defaulted fields are
    /// emitted too, so representation is deterministic and total.
    fn represent_fields(
        &self,
        ctx: &RepresentContext<'_>,
    ) -> Result<Vec<(&'static str, Node)>, Error>;
}

/// The fields of one record mapping, keyed by name.
pub struct FieldMap<'n> {
    record: &'static str,
    entries: Vec<(String, &'n Node)>,
    location: Location,
}

impl<'n> FieldMap<'n> {
    fn from_mapping(record: &'static str, node: &'n Node) -> Result<Self, Error> {
        let pairs = node.as_mapping().ok_or_else(|| {
            Error::type_assertion(record, node.kind_name(), node.location)
        })?;
        let mut entries = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let (name, _) = key.as_scalar().ok_or_else(|| {
                Error::type_assertion("a string field name", key.kind_name(), key.location)
            })?;
            entries.push((name.to_string(), value));
        }
        Ok(FieldMap {
            record,
            entries,
            location: node.location,
        })
    }

    /// Location of the mapping this map was built from.
    pub fn location(&self) -> Location {
        self.location
    }

    fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    fn remove(&mut self, name: &str) -> Option<&'n Node> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Take a required field and construct it as `T`.
    pub fn take<T: FromValue>(
        &mut self,
        name: &'static str,
        ctx: &ConstructContext<'_>,
    ) -> Result<T, Error> {
        match self.remove(name) {
            Some(node) => ctx.construct_as::<T>(node),
            None => Err(Error::MissingFields {
                record: self.record,
                fields: vec![name.to_string()],
                location: self.location,
            }),
        }
    }

    /// Take an optional field, falling back to `default` when absent.
    pub fn take_or<T: FromValue>(
        &mut self,
        name: &'static str,
        ctx: &ConstructContext<'_>,
        default: impl FnOnce() -> T,
    ) -> Result<T, Error> {
        match self.remove(name) {
            Some(node) => ctx.construct_as::<T>(node),
            None => Ok(default()),
        }
    }
}

/// Converter for a [`Record`] type: validates field presence from both
/// sides, then delegates construction and representation to the generated
/// field glue.
pub struct RecordConverter<T: Record> {
    specs: &'static [FieldSpec],
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> RecordConverter<T> {
    /// Bind the field table; called once, at registration.
    pub fn new() -> Self {
        RecordConverter {
            specs: T::field_specs(),
            _marker: PhantomData,
        }
    }
}

impl<T: Record> Default for RecordConverter<T> {
    fn default() -> Self {
        RecordConverter::new()
    }
}

impl<T: Record> Converter for RecordConverter<T> {
    type Target = T;

    fn describe(&self) -> &'static str {
        T::record_name()
    }

    fn construct_mapping(&self, node: &Node, ctx: &ConstructContext<'_>) -> Result<T, Error> {
        let mut fields = FieldMap::from_mapping(T::record_name(), node)?;

        let missing: Vec<String> = self
            .specs
            .iter()
            .filter(|spec| spec.required && !fields.contains(spec.name))
            .map(|spec| spec.name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingFields {
                record: T::record_name(),
                fields: missing,
                location: node.location,
            });
        }

        let extra: Vec<String> = fields
            .entries
            .iter()
            .map(|(name, _)| name.clone())
            .filter(|name| !self.specs.iter().any(|spec| spec.name == name))
            .collect();
        if !extra.is_empty() {
            return Err(Error::UnexpectedFields {
                record: T::record_name(),
                fields: extra,
                location: node.location,
            });
        }

        T::construct_fields(&mut fields, ctx)
    }

    fn represent(&self, value: &T, ctx: &RepresentContext<'_>) -> Result<Node, Error> {
        let fields = value.represent_fields(ctx)?;
        let pairs = fields
            .into_iter()
            .map(|(name, node)| (Node::plain(name), node))
            .collect();
        Ok(Node::mapping(pairs, Location::UNKNOWN).with_tag(ctx.tag().map(String::from)))
    }
}
