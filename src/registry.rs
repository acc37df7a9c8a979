//! The converter registry: tag → converter and target type → converter.
//!
//! Each [`Parser`](crate::parser::Parser) owns its own registry, so
//! registering a tag on one parser never affects another. After
//! configuration the registry is read-only; bindings are `Arc`ed and
//! converters `Send + Sync`, which is what makes concurrent parses over a
//! shared parser sound.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::convert::{Converter, ErasedConverter};
use crate::error::Error;
use crate::tags;
use crate::value::short_type_name;

/// One registered converter with the tag it is bound to.
pub(crate) struct Binding {
    pub(crate) tag: String,
    pub(crate) converter: Box<dyn ErasedConverter>,
}

/// Tag- and type-keyed converter lookup tables.
#[derive(Default)]
pub struct Registry {
    by_tag: HashMap<String, Arc<Binding>>,
    by_type: HashMap<TypeId, Arc<Binding>>,
}

/// The tag derived from a type's declared name: `!` + short type name.
pub(crate) fn default_tag<T: 'static>() -> String {
    format!("!{}", short_type_name::<T>())
}

impl Registry {
    pub(crate) fn new() -> Self {
        Registry::default()
    }

    /// Bind `converter` under `tag` (or the target type's derived `!Name`
    /// tag). Errors if the tag or the target type is already bound, or if
    /// the tag would shadow the YAML core schema.
    pub(crate) fn register<C: Converter>(
        &mut self,
        tag: Option<String>,
        converter: C,
    ) -> Result<(), Error> {
        let tag = tag.unwrap_or_else(default_tag::<C::Target>);
        let tag = tags::normalize(&tag);
        if tags::is_core_tag(&tag) {
            return Err(Error::Registration {
                msg: format!("tag `{tag}` belongs to the YAML core schema"),
            });
        }
        if self.by_tag.contains_key(&tag) {
            return Err(Error::Registration {
                msg: format!("a converter already exists for tag `{tag}`"),
            });
        }
        let type_id = converter.target_type_id();
        if self.by_type.contains_key(&type_id) {
            return Err(Error::Registration {
                msg: format!(
                    "a converter already exists for type `{}`",
                    converter.target_type_name()
                ),
            });
        }
        let binding = Arc::new(Binding {
            tag: tag.clone(),
            converter: Box::new(converter),
        });
        self.by_tag.insert(tag, binding.clone());
        self.by_type.insert(type_id, binding);
        Ok(())
    }

    /// Resolve a converter for construction by the node's explicit tag.
    pub(crate) fn for_tag(&self, tag: &str) -> Option<&Binding> {
        self.by_tag.get(tag).map(Arc::as_ref)
    }

    /// Resolve a converter for representation (or type-directed
    /// construction) by the exact runtime type.
    pub(crate) fn for_type(&self, type_id: TypeId) -> Option<&Binding> {
        self.by_type.get(&type_id).map(Arc::as_ref)
    }
}
