//! Provides the dynamic value type the renderer works with.
//!
//! Render contexts are arbitrary [`Serialize`] values.  Before rendering
//! they are converted into a [`Value`] tree which the renderer then walks
//! when resolving paths.
//!
//! # Basic Value Conversions
//!
//! Values are typically created via the [`From`] trait:
//!
//! ```
//! # use mailmerge::value::Value;
//! let int_value = Value::from(42);
//! let none_value = Value::from(());
//! let true_value = Value::from(true);
//! let seq_value = Value::from(vec![1, 2, 3]);
//! ```
//!
//! # Serde Conversions
//!
//! Any type implementing [`Serialize`] can be converted with
//! [`Value::from_serializable`]:
//!
//! ```
//! # use mailmerge::value::Value;
//! let value = Value::from_serializable(&[1, 2, 3]).unwrap();
//! assert_eq!(value.to_string(), "[1, 2, 3]");
//! ```
//!
//! Integers are stored as `i64`.  Unsigned or 128 bit integers that do
//! not fit fail the conversion with
//! [`ErrorKind::BadSerialization`](crate::ErrorKind::BadSerialization).
use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::Error;
use crate::value::serialize::ValueSerializer;

mod serialize;

/// The map type used by [`Value::Map`].
///
/// With the `preserve_order` feature maps keep their insertion order,
/// otherwise keys are sorted.
#[cfg(feature = "preserve_order")]
pub type ValueMap = indexmap::IndexMap<String, Value>;

/// The map type used by [`Value::Map`].
///
/// With the `preserve_order` feature maps keep their insertion order,
/// otherwise keys are sorted.
#[cfg(not(feature = "preserve_order"))]
pub type ValueMap = std::collections::BTreeMap<String, Value>;

/// Describes the kind of a value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValueKind {
    None,
    Bool,
    Number,
    String,
    Seq,
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            ValueKind::None => "none",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Seq => "sequence",
            ValueKind::Map => "map",
        })
    }
}

/// A dynamically typed context value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// The absence of a value (`null`, `()` or `Option::None`).
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Seq(Vec<Value>),
    Map(ValueMap),
}

impl Value {
    /// Creates a value from something that can be serialized.
    ///
    /// ```
    /// # use mailmerge::value::Value;
    /// #[derive(serde::Serialize)]
    /// struct Person {
    ///     name: &'static str,
    /// }
    ///
    /// let value = Value::from_serializable(&Person { name: "Peter" }).unwrap();
    /// assert_eq!(value.get_attr("name"), Some(&Value::from("Peter")));
    /// ```
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Value, Error> {
        value.serialize(ValueSerializer)
    }

    /// Returns the kind of the value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::None => ValueKind::None,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) | Value::Float(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Seq(_) => ValueKind::Seq,
            Value::Map(_) => ValueKind::Map,
        }
    }

    /// Is this value none?
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns the truthiness of the value if it has one.
    ///
    /// Booleans are themselves, strings, sequences and maps are true if
    /// they are not empty.  Numbers and none have no truth value.
    pub fn truthiness(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::String(s) => Some(!s.is_empty()),
            Value::Seq(items) => Some(!items.is_empty()),
            Value::Map(map) => Some(!map.is_empty()),
            Value::None | Value::Int(_) | Value::Float(_) => None,
        }
    }

    /// If the value is a string, returns it.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a sequence, returns its items.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a key in a map value.
    ///
    /// Returns `None` if the value is not a map or the key is missing.
    pub fn get_attr(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }
}

/// Formats a nested value the way it shows up inside a sequence or map.
struct Repr<'a>(&'a Value);

impl fmt::Display for Repr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(s) => write!(f, "{s:?}"),
            other => fmt::Display::fmt(other, f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("none"),
            Value::Bool(val) => fmt::Display::fmt(val, f),
            Value::Int(val) => fmt::Display::fmt(val, f),
            Value::Float(val) => {
                if val.is_nan() {
                    f.write_str("NaN")
                } else if val.is_infinite() {
                    write!(f, "{}inf", if val.is_sign_negative() { "-" } else { "" })
                } else {
                    let mut num = val.to_string();
                    if !num.contains('.') {
                        num.push_str(".0");
                    }
                    write!(f, "{num}")
                }
            }
            Value::String(val) => f.write_str(val),
            Value::Seq(items) => {
                ok!(f.write_str("["));
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        ok!(f.write_str(", "));
                    }
                    ok!(write!(f, "{}", Repr(item)));
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                ok!(f.write_str("{"));
                for (idx, (key, value)) in map.iter().enumerate() {
                    if idx > 0 {
                        ok!(f.write_str(", "));
                    }
                    ok!(write!(f, "{:?}: {}", key, Repr(value)));
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::None => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Seq(items) => {
                let mut seq = ok!(serializer.serialize_seq(Some(items.len())));
                for item in items {
                    ok!(seq.serialize_element(item));
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut m = ok!(serializer.serialize_map(Some(map.len())));
                for (key, value) in map {
                    ok!(m.serialize_entry(key, value));
                }
                m.end()
            }
        }
    }
}

macro_rules! value_from {
    ($src:ty, $dst:ident) => {
        impl From<$src> for Value {
            #[inline(always)]
            fn from(val: $src) -> Self {
                Value::$dst(val.into())
            }
        }
    };
}

value_from!(bool, Bool);
value_from!(u8, Int);
value_from!(u16, Int);
value_from!(u32, Int);
value_from!(i8, Int);
value_from!(i16, Int);
value_from!(i32, Int);
value_from!(i64, Int);
value_from!(f32, Float);
value_from!(f64, Float);
value_from!(String, String);
value_from!(ValueMap, Map);

impl From<()> for Value {
    #[inline(always)]
    fn from(_: ()) -> Self {
        Value::None
    }
}

impl From<char> for Value {
    #[inline(always)]
    fn from(val: char) -> Self {
        Value::String(val.to_string())
    }
}

impl<'a> From<&'a str> for Value {
    #[inline(always)]
    fn from(val: &'a str) -> Self {
        Value::String(val.to_string())
    }
}

impl<'a> From<&'a String> for Value {
    #[inline(always)]
    fn from(val: &'a String) -> Self {
        Value::String(val.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(val: Option<T>) -> Self {
        match val {
            Some(val) => val.into(),
            None => Value::None,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(val: Vec<T>) -> Self {
        Value::Seq(val.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<Value>> FromIterator<V> for Value {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        Value::Seq(iter.into_iter().map(Into::into).collect())
    }
}
