//! The parser facade: one place that owns the registry and options, and
//! wires scan → construct and represent → emit together.

use std::fs;
use std::marker::PhantomData;
use std::path::Path;

use crate::compose::compose_documents;
use crate::convert::{ConstructContext, Converter, RepresentContext};
use crate::emit::emit_to_string;
use crate::error::Error;
use crate::location::Location;
use crate::node::{Node, NodeKind, ScalarStyle};
use crate::options::Options;
use crate::record::{Record, RecordConverter};
use crate::registry::Registry;
use crate::value::{FromValue, ToValue, Value};

/// A YAML parser/dumper with its own converter registry.
///
/// Each parser owns an isolated [`Registry`]; registering a tag here never
/// affects other parsers. Registration requires `&mut self` and must not be
/// interleaved with parsing from other threads; after configuration,
/// `parse*` and `dump*` are read-only and safe to call concurrently on a
/// shared parser.
///
/// ```rust
/// use blockyaml::Parser;
///
/// blockyaml::yaml_record! {
///     pub struct Rect {
///         x: i64,
///         y: i64,
///     }
/// }
///
/// let mut parser = Parser::new();
/// parser.register_record::<Rect>().unwrap();
///
/// let rect: Rect = parser.typed().parse_str("!Rect\nx: 2\ny: 4\n").unwrap();
/// assert_eq!(rect, Rect { x: 2, y: 4 });
/// assert_eq!(parser.dump_str(&rect).unwrap(), "!Rect\nx: 2\ny: 4\n");
/// ```
pub struct Parser {
    registry: Registry,
    options: Options,
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

impl Parser {
    /// A parser with default [`Options`] and an empty registry.
    pub fn new() -> Self {
        Parser::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Parser {
            registry: Registry::new(),
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Register a converter under the tag derived from its target type's
    /// name (`!TypeName`).
    pub fn register<C: Converter>(&mut self, converter: C) -> Result<(), Error> {
        self.registry.register(None, converter)
    }

    /// Register a converter under an explicit tag.
    pub fn register_with_tag<C: Converter>(
        &mut self,
        tag: impl Into<String>,
        converter: C,
    ) -> Result<(), Error> {
        self.registry.register(Some(tag.into()), converter)
    }

    /// Register a record type declared with
    /// [`yaml_record!`](crate::yaml_record) under its `!Name` tag.
    pub fn register_record<T: Record>(&mut self) -> Result<(), Error> {
        self.registry.register(
            Some(format!("!{}", T::record_name())),
            RecordConverter::<T>::new(),
        )
    }

    /// A view of this parser that parses into (and asserts) type `T`.
    pub fn typed<T: FromValue>(&self) -> TypedParser<'_, T> {
        TypedParser {
            parser: self,
            _marker: PhantomData,
        }
    }

    fn compose_single(&self, text: &str) -> Result<Option<Node>, Error> {
        let mut docs = compose_documents(text, &self.options)?;
        match docs.len() {
            0 | 1 => Ok(docs.pop()),
            n => Err(Error::msg(format!(
                "expected a single YAML document, found {n}"
            ))),
        }
    }

    /// Parse one YAML document into a [`Value`].
    ///
    /// An empty input yields [`Value::Null`]; a stream with more than one
    /// document is an error (see [`Parser::parse_multi_str`]).
    pub fn parse_str(&self, text: &str) -> Result<Value, Error> {
        let ctx = ConstructContext::new(&self.registry, &self.options);
        match self.compose_single(text)? {
            Some(node) => ctx.construct(&node),
            None => Ok(Value::Null),
        }
    }

    /// Parse a multi-document stream, skipping empty documents.
    pub fn parse_multi_str(&self, text: &str) -> Result<Vec<Value>, Error> {
        let ctx = ConstructContext::new(&self.registry, &self.options);
        compose_documents(text, &self.options)?
            .iter()
            .filter(|node| !is_empty_document(node))
            .map(|node| ctx.construct(node))
            .collect()
    }

    /// Read a file and parse it as a single document.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Value, Error> {
        let text = fs::read_to_string(path)?;
        self.parse_str(&text)
    }

    /// Represent a value and render it as YAML text.
    pub fn dump_str<T: ToValue + ?Sized>(&self, value: &T) -> Result<String, Error> {
        let ctx = RepresentContext::new(&self.registry);
        let node = ctx.represent(value)?;
        Ok(emit_to_string(&node))
    }

    /// Represent a value and write the YAML text to a file.
    pub fn dump<T: ToValue + ?Sized>(
        &self,
        value: &T,
        path: impl AsRef<Path>,
    ) -> Result<(), Error> {
        let text = self.dump_str(value)?;
        fs::write(path, text)?;
        Ok(())
    }
}

/// An untagged document that is just an empty plain scalar.
fn is_empty_document(node: &Node) -> bool {
    node.tag.is_none()
        && matches!(
            &node.kind,
            NodeKind::Scalar { value, style: ScalarStyle::Plain } if value.is_empty()
        )
}

/// A parser view bound to an expected top-level type.
///
/// Construction applies the registry's type-based fallback for untagged
/// documents and asserts the result type: a document of the wrong shape
/// fails with [`Error::TypeAssertion`] instead of returning a mismatched
/// value.
pub struct TypedParser<'p, T> {
    parser: &'p Parser,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromValue> TypedParser<'_, T> {
    /// Parse one YAML document as `T`.
    pub fn parse_str(&self, text: &str) -> Result<T, Error> {
        let ctx = ConstructContext::new(&self.parser.registry, &self.parser.options);
        match self.parser.compose_single(text)? {
            Some(node) => ctx.construct_as::<T>(&node),
            None => T::from_value(Value::Null, Location::UNKNOWN),
        }
    }

    /// Read a file and parse it as `T`.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<T, Error> {
        let text = fs::read_to_string(path)?;
        self.parse_str(&text)
    }
}

impl<T: ToValue> TypedParser<'_, T> {
    pub fn dump_str(&self, value: &T) -> Result<String, Error> {
        self.parser.dump_str(value)
    }

    pub fn dump(&self, value: &T, path: impl AsRef<Path>) -> Result<(), Error> {
        self.parser.dump(value, path)
    }
}
