//! The converter protocol and the built-in construction/representation
//! rules.
//!
//! A [`Converter`] binds one YAML tag to one Rust type and knows how to
//! build that type from a [`Node`] and how to turn it back into a node.
//! Conversion of untagged content (plain scalars, sequences, mappings) is
//! built into the contexts; converters only cover tagged/custom types and
//! dispatch back into the contexts for their nested content.

use std::any::{Any, TypeId};

use crate::error::Error;
use crate::node::{Node, NodeKind, ScalarStyle};
use crate::options::Options;
use crate::quoting::string_style;
use crate::registry::{Binding, Registry};
use crate::scalars::{self, Resolved};
use crate::tags;
use crate::value::{short_type_name, FromValue, ToValue, Value};

/// Bidirectional mapping between nodes and values of one target type.
///
/// `construct` dispatches on the node kind; the per-kind methods default to
/// a type-assertion error, so a converter only implements the shapes its
/// tag supports. `represent` defaults to an error as well: a tag can be
/// registered for parsing only.
pub trait Converter: Send + Sync + 'static {
    /// The Rust type this converter produces and consumes.
    type Target: ToValue + Any;

    /// Short name of the target type, used in error messages.
    fn describe(&self) -> &'static str {
        short_type_name::<Self::Target>()
    }

    fn construct(&self, node: &Node, ctx: &ConstructContext<'_>) -> Result<Self::Target, Error> {
        match &node.kind {
            NodeKind::Scalar { .. } => self.construct_scalar(node, ctx),
            NodeKind::Sequence(_) => self.construct_sequence(node, ctx),
            NodeKind::Mapping(_) => self.construct_mapping(node, ctx),
        }
    }

    fn construct_scalar(
        &self,
        node: &Node,
        _ctx: &ConstructContext<'_>,
    ) -> Result<Self::Target, Error> {
        Err(Error::type_assertion(
            self.describe(),
            node.kind_name(),
            node.location,
        ))
    }

    fn construct_sequence(
        &self,
        node: &Node,
        _ctx: &ConstructContext<'_>,
    ) -> Result<Self::Target, Error> {
        Err(Error::type_assertion(
            self.describe(),
            node.kind_name(),
            node.location,
        ))
    }

    fn construct_mapping(
        &self,
        node: &Node,
        _ctx: &ConstructContext<'_>,
    ) -> Result<Self::Target, Error> {
        Err(Error::type_assertion(
            self.describe(),
            node.kind_name(),
            node.location,
        ))
    }

    fn represent(
        &self,
        _value: &Self::Target,
        _ctx: &RepresentContext<'_>,
    ) -> Result<Node, Error> {
        Err(Error::msg(format!(
            "converter for `{}` does not implement represent",
            self.describe()
        )))
    }
}

/// Object-safe view of a [`Converter`], stored in the registry.
///
/// Erasure goes through [`Value`]: construction wraps the typed result via
/// [`ToValue`], representation downcasts back to the target type.
pub(crate) trait ErasedConverter: Send + Sync {
    fn construct_value(&self, node: &Node, ctx: &ConstructContext<'_>) -> Result<Value, Error>;
    fn represent_any(&self, value: &dyn Any, ctx: &RepresentContext<'_>) -> Result<Node, Error>;
    fn target_type_id(&self) -> TypeId;
    fn target_type_name(&self) -> &'static str;
}

impl<C: Converter> ErasedConverter for C {
    fn construct_value(&self, node: &Node, ctx: &ConstructContext<'_>) -> Result<Value, Error> {
        Ok(self.construct(node, ctx)?.to_value())
    }

    fn represent_any(&self, value: &dyn Any, ctx: &RepresentContext<'_>) -> Result<Node, Error> {
        match value.downcast_ref::<C::Target>() {
            Some(v) => self.represent(v, ctx),
            None => Err(Error::msg(format!(
                "represent dispatched to converter for `{}` with a value of another type",
                self.target_type_name()
            ))),
        }
    }

    fn target_type_id(&self) -> TypeId {
        TypeId::of::<C::Target>()
    }

    fn target_type_name(&self) -> &'static str {
        short_type_name::<C::Target>()
    }
}

/// Construction-time context handed to converters.
///
/// Carries the registry and options so converters can recursively construct
/// nested content, and the tag the running converter was resolved under.
pub struct ConstructContext<'a> {
    registry: &'a Registry,
    options: &'a Options,
    tag: Option<&'a str>,
}

impl<'a> ConstructContext<'a> {
    pub(crate) fn new(registry: &'a Registry, options: &'a Options) -> Self {
        ConstructContext {
            registry,
            options,
            tag: None,
        }
    }

    fn scoped(&self, binding: &'a Binding) -> Self {
        ConstructContext {
            registry: self.registry,
            options: self.options,
            tag: Some(binding.tag.as_str()),
        }
    }

    /// The parser options in effect for this parse.
    pub fn options(&self) -> &Options {
        self.options
    }

    /// The tag the currently-running converter is bound to, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag
    }

    /// Construct a [`Value`] from a node: dispatch by explicit tag, falling
    /// back to the built-in rules for untagged content.
    pub fn construct(&self, node: &Node) -> Result<Value, Error> {
        match node.tag.as_deref() {
            None => self.construct_untagged(node),
            Some(tag) if tags::is_core_tag(tag) => self.construct_core_tagged(node, tag),
            Some(tag) => match self.registry.for_tag(tag) {
                Some(binding) => binding.converter.construct_value(node, &self.scoped(binding)),
                None => Err(Error::UnknownTag {
                    tag: tag.to_string(),
                    location: node.location,
                }),
            },
        }
    }

    /// Construct a node as a specific Rust type.
    ///
    /// For an untagged node whose requested type has a registered converter,
    /// construction is directed through that converter (the type-based
    /// fallback of the registry). Otherwise the node is constructed
    /// generically and the result converted, so a mismatch surfaces as a
    /// type-assertion error rather than a silently wrong value.
    pub fn construct_as<T: FromValue>(&self, node: &Node) -> Result<T, Error> {
        if node.tag.is_none() {
            if let Some(binding) = self.registry.for_type(TypeId::of::<T>()) {
                let value = binding.converter.construct_value(node, &self.scoped(binding))?;
                return T::from_value(value, node.location);
            }
        }
        let value = self.construct(node)?;
        T::from_value(value, node.location)
    }

    fn construct_untagged(&self, node: &Node) -> Result<Value, Error> {
        match &node.kind {
            NodeKind::Scalar { value, style } => {
                if *style == ScalarStyle::Plain {
                    Ok(resolved_to_value(
                        scalars::resolve_plain(value, self.options, node.location)?,
                        value,
                    ))
                } else {
                    Ok(Value::Str(value.clone()))
                }
            }
            NodeKind::Sequence(items) => Ok(Value::Seq(
                items.iter().map(|n| self.construct(n)).collect::<Result<_, _>>()?,
            )),
            NodeKind::Mapping(pairs) => Ok(Value::Map(
                pairs
                    .iter()
                    .map(|(k, v)| Ok((self.construct(k)?, self.construct(v)?)))
                    .collect::<Result<_, Error>>()?,
            )),
        }
    }

    /// Forced resolution for core-schema tags (`!!str`, `!!int`, ...).
    fn construct_core_tagged(&self, node: &Node, tag: &str) -> Result<Value, Error> {
        let scalar_text = node.as_scalar().map(|(text, _)| text);
        match tag {
            tags::TAG_STR => match scalar_text {
                Some(text) => Ok(Value::Str(text.to_string())),
                None => Err(Error::type_assertion("a string scalar", node.kind_name(), node.location)),
            },
            tags::TAG_INT => match scalar_text {
                Some(text) => scalars::parse_i64(text, self.options.legacy_octal_numbers)
                    .map(Value::Int)
                    .ok_or_else(|| {
                        Error::syntax(format!("invalid integer `{text}`"), node.location)
                    }),
                None => Err(Error::type_assertion("an integer scalar", node.kind_name(), node.location)),
            },
            tags::TAG_FLOAT => match scalar_text {
                Some(text) => scalars::parse_f64(text).map(Value::Float).ok_or_else(|| {
                    Error::syntax(format!("invalid float `{text}`"), node.location)
                }),
                None => Err(Error::type_assertion("a float scalar", node.kind_name(), node.location)),
            },
            tags::TAG_BOOL => match scalar_text {
                Some(text) => self.construct_forced_bool(text, node),
                None => Err(Error::type_assertion("a boolean scalar", node.kind_name(), node.location)),
            },
            tags::TAG_NULL => Ok(Value::Null),
            tags::TAG_SEQ if node.as_sequence().is_some() => {
                self.construct_untagged(node)
            }
            tags::TAG_MAP if node.as_mapping().is_some() => self.construct_untagged(node),
            _ => Err(Error::type_assertion(
                "a node matching its core tag",
                node.kind_name(),
                node.location,
            )),
        }
    }

    /// `!!bool` forces boolean resolution, but the strict literal policy
    /// still applies: an explicitly tagged `yes` is as unsafe as a plain one.
    fn construct_forced_bool(&self, text: &str, node: &Node) -> Result<Value, Error> {
        if let Some(b) = scalars::parse_bool_strict(text) {
            return Ok(Value::Bool(b));
        }
        if scalars::is_ambiguous_bool(text) {
            if self.options.strict_booleans {
                return Err(Error::UnsafeBoolean {
                    token: text.to_string(),
                    location: node.location,
                });
            }
            if let Some(b) = scalars::parse_yaml11_bool(text) {
                return Ok(Value::Bool(b));
            }
        }
        Err(Error::syntax(format!("invalid boolean `{text}`"), node.location))
    }
}

fn resolved_to_value(resolved: Resolved, raw: &str) -> Value {
    match resolved {
        Resolved::Null => Value::Null,
        Resolved::Bool(b) => Value::Bool(b),
        Resolved::Int(i) => Value::Int(i),
        Resolved::Float(f) => Value::Float(f),
        Resolved::Str => Value::Str(raw.to_string()),
    }
}

/// Representation-time context handed to converters.
pub struct RepresentContext<'a> {
    registry: &'a Registry,
    tag: Option<&'a str>,
}

impl<'a> RepresentContext<'a> {
    pub(crate) fn new(registry: &'a Registry) -> Self {
        RepresentContext {
            registry,
            tag: None,
        }
    }

    fn scoped(&self, binding: &'a Binding) -> Self {
        RepresentContext {
            registry: self.registry,
            tag: Some(binding.tag.as_str()),
        }
    }

    /// The tag the currently-running converter is bound to, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag
    }

    /// Represent any convertible Rust value as a node.
    pub fn represent<T: ToValue + ?Sized>(&self, value: &T) -> Result<Node, Error> {
        self.represent_value(&value.to_value())
    }

    /// Represent a [`Value`] as a node.
    ///
    /// Built-in values get built-in representations; custom values dispatch
    /// through the registry by their exact runtime type. No registered
    /// converter for that type is an error, never a guess.
    pub fn represent_value(&self, value: &Value) -> Result<Node, Error> {
        match value {
            Value::Null => Ok(Node::plain("null")),
            Value::Bool(b) => Ok(Node::plain(if *b { "true" } else { "false" })),
            Value::Int(i) => Ok(Node::plain(i.to_string())),
            Value::Float(f) => Ok(Node::plain(format_float(*f))),
            Value::Str(s) => Ok(Node::scalar(
                s.clone(),
                string_style(s),
                crate::location::Location::UNKNOWN,
            )),
            Value::Seq(items) => {
                let nodes = items
                    .iter()
                    .map(|v| self.represent_value(v))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Node::sequence(nodes, crate::location::Location::UNKNOWN))
            }
            Value::Map(pairs) => {
                let nodes = pairs
                    .iter()
                    .map(|(k, v)| Ok((self.represent_value(k)?, self.represent_value(v)?)))
                    .collect::<Result<Vec<_>, Error>>()?;
                Ok(Node::mapping(nodes, crate::location::Location::UNKNOWN))
            }
            Value::Custom(custom) => match self.registry.for_type(custom.type_id()) {
                Some(binding) => binding
                    .converter
                    .represent_any(custom.as_any(), &self.scoped(binding)),
                None => Err(Error::UnknownType {
                    type_name: custom.type_name(),
                }),
            },
        }
    }
}

/// Render a float the way the emitter expects: shortest round-trip form
/// with a decimal point or exponent, and YAML spellings for the specials.
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        return ".nan".to_string();
    }
    if f.is_infinite() {
        return if f.is_sign_positive() { ".inf" } else { "-.inf" }.to_string();
    }
    let mut buf = zmij::Buffer::new();
    let s = buf.format_finite(f);
    if s.contains('.') {
        return s.to_string();
    }
    // zmij may render 4e-6 without a decimal point; YAML floats want 4.0e-6.
    match s.find(['e', 'E']) {
        Some(pos) => format!("{}.0{}", &s[..pos], &s[pos..]),
        None => format!("{s}.0"),
    }
}
