//! Typed in-memory values produced by construction and consumed by
//! representation.
//!
//! [`Value`] covers the YAML core schema (null, booleans, integers, floats,
//! strings, sequences, mappings) plus [`Value::Custom`], which type-erases
//! instances of registered record/custom types so they can travel through
//! untyped parses and be dispatched by runtime type when dumping.

use std::any::{Any, TypeId};
use std::fmt;

use crate::error::Error;
use crate::location::Location;

/// Object-safe bundle of the capabilities a custom value must have to live
/// inside a [`Value`]: debug formatting, cloning, and equality.
pub trait DynValue: Any + fmt::Debug {
    fn clone_box(&self) -> Box<dyn DynValue>;
    fn dyn_eq(&self, other: &dyn Any) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T> DynValue for T
where
    T: Any + fmt::Debug + Clone + PartialEq,
{
    fn clone_box(&self) -> Box<dyn DynValue> {
        Box::new(self.clone())
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|o| self == o)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A type-erased instance of a registered custom type.
#[derive(Debug)]
pub struct CustomValue {
    type_name: &'static str,
    inner: Box<dyn DynValue>,
}

impl CustomValue {
    /// Wrap a concrete value, remembering its short type name for
    /// diagnostics.
    pub fn new<T>(value: T) -> Self
    where
        T: Any + fmt::Debug + Clone + PartialEq,
    {
        CustomValue {
            type_name: short_type_name::<T>(),
            inner: Box::new(value),
        }
    }

    /// Short name of the wrapped type (e.g. `Date`).
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.inner.as_any().type_id()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    /// Take the wrapped value out, or give the wrapper back on type
    /// mismatch.
    pub fn downcast<T: Any>(self) -> Result<T, CustomValue> {
        if self.downcast_ref::<T>().is_some() {
            let any = self.inner.into_any();
            match any.downcast::<T>() {
                Ok(boxed) => Ok(*boxed),
                Err(_) => unreachable!("downcast_ref and downcast disagree"),
            }
        } else {
            Err(self)
        }
    }

    pub(crate) fn as_any(&self) -> &dyn Any {
        self.inner.as_any()
    }
}

impl Clone for CustomValue {
    fn clone(&self) -> Self {
        CustomValue {
            type_name: self.type_name,
            inner: self.inner.clone_box(),
        }
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.inner.dyn_eq(other.inner.as_any())
    }
}

/// Strip the module path (and any generic arguments) from a type name.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// A constructed YAML value.
///
/// Mappings are ordered pair lists, mirroring the node tree; key lookup via
/// [`Value::get`] is linear, which is the right trade-off for the
/// configuration-sized documents this crate targets.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Custom(CustomValue),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Look up a mapping value by string key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.iter().find_map(|(k, v)| match k {
            Value::Str(s) if s == key => Some(v),
            _ => None,
        })
    }

    /// Borrow the wrapped custom value, if this is a `Custom` of type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(custom) => custom.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Human description of this value for error messages.
    pub fn describe(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "a boolean".to_string(),
            Value::Int(_) => "an integer".to_string(),
            Value::Float(_) => "a float".to_string(),
            Value::Str(_) => "a string".to_string(),
            Value::Seq(_) => "a sequence".to_string(),
            Value::Map(_) => "a mapping".to_string(),
            Value::Custom(custom) => format!("a value of type `{}`", custom.type_name()),
        }
    }
}

/// Conversion from a constructed [`Value`] into a concrete Rust type.
///
/// A failed conversion is a type assertion failure: the caller asked for a
/// type the document does not contain, and the error says so rather than
/// letting a mismatched value through.
pub trait FromValue: Sized + 'static {
    /// Human name used in type-assertion errors (e.g. `a string`, `Date`).
    fn expected() -> &'static str;

    fn from_value(value: Value, location: Location) -> Result<Self, Error>;
}

fn mismatch<T: FromValue>(value: &Value, location: Location) -> Error {
    Error::type_assertion(T::expected(), value.describe(), location)
}

/// Build the type-assertion error for a failed conversion. Used by the
/// expansion of [`yaml_record!`](crate::yaml_record).
#[doc(hidden)]
pub fn __type_mismatch(expected: &'static str, value: &Value, location: Location) -> Error {
    Error::type_assertion(expected, value.describe(), location)
}

impl FromValue for Value {
    fn expected() -> &'static str {
        "any value"
    }

    fn from_value(value: Value, _location: Location) -> Result<Self, Error> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn expected() -> &'static str {
        "a boolean"
    }

    fn from_value(value: Value, location: Location) -> Result<Self, Error> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch::<bool>(&other, location)),
        }
    }
}

impl FromValue for String {
    fn expected() -> &'static str {
        "a string"
    }

    fn from_value(value: Value, location: Location) -> Result<Self, Error> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(mismatch::<String>(&other, location)),
        }
    }
}

impl FromValue for f64 {
    fn expected() -> &'static str {
        "a float"
    }

    fn from_value(value: Value, location: Location) -> Result<Self, Error> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(mismatch::<f64>(&other, location)),
        }
    }
}

impl FromValue for f32 {
    fn expected() -> &'static str {
        "a float"
    }

    fn from_value(value: Value, location: Location) -> Result<Self, Error> {
        f64::from_value(value, location).map(|f| f as f32)
    }
}

macro_rules! int_from_value {
    ( $( $ty:ty ),* ) => {
        $(
            impl FromValue for $ty {
                fn expected() -> &'static str {
                    "an integer"
                }

                fn from_value(value: Value, location: Location) -> Result<Self, Error> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(i).map_err(|_| {
                            Error::type_assertion(
                                concat!("an integer fitting ", stringify!($ty)),
                                format!("{i}"),
                                location,
                            )
                        }),
                        other => Err(mismatch::<$ty>(&other, location)),
                    }
                }
            }
        )*
    };
}

int_from_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl<T: FromValue> FromValue for Vec<T> {
    fn expected() -> &'static str {
        "a sequence"
    }

    fn from_value(value: Value, location: Location) -> Result<Self, Error> {
        match value {
            Value::Seq(items) => items
                .into_iter()
                .map(|item| T::from_value(item, location))
                .collect(),
            other => Err(mismatch::<Vec<T>>(&other, location)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn expected() -> &'static str {
        T::expected()
    }

    fn from_value(value: Value, location: Location) -> Result<Self, Error> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other, location).map(Some),
        }
    }
}

/// Conversion from a Rust value into a [`Value`] for representation.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl ToValue for &str {
    fn to_value(&self) -> Value {
        Value::Str((*self).to_string())
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(*self as f64)
    }
}

macro_rules! int_to_value {
    ( $( $ty:ty ),* ) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    match i64::try_from(*self) {
                        Ok(i) => Value::Int(i),
                        // Out-of-range unsigned values degrade to float,
                        // matching plain-scalar resolution of huge numbers.
                        Err(_) => Value::Float(*self as f64),
                    }
                }
            }
        )*
    };
}

int_to_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_values_compare_by_inner_equality() {
        let a = CustomValue::new(42i32);
        let b = CustomValue::new(42i32);
        let c = CustomValue::new(7i32);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, CustomValue::new("42".to_string()));
    }

    #[test]
    fn custom_downcast_round_trips() {
        let custom = CustomValue::new(vec![1i64, 2, 3]);
        assert_eq!(custom.type_name(), "Vec");
        assert_eq!(custom.downcast_ref::<Vec<i64>>(), Some(&vec![1, 2, 3]));
        let back: Vec<i64> = custom.downcast().unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }

    #[test]
    fn map_lookup_by_string_key() {
        let map = Value::Map(vec![
            (Value::Str("a".into()), Value::Int(1)),
            (Value::Str("b".into()), Value::Bool(true)),
        ]);
        assert_eq!(map.get("a"), Some(&Value::Int(1)));
        assert_eq!(map.get("missing"), None);
    }

    #[test]
    fn from_value_reports_type_assertions() {
        let err = String::from_value(Value::Int(3), Location::UNKNOWN).unwrap_err();
        assert!(matches!(err, Error::TypeAssertion { .. }));
        assert!(err.to_string().contains("expected a string"));
    }
}
