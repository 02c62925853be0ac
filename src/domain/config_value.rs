// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dynamically-typed configuration values.
//!
//! This module provides the `ConfigValue` type, the untyped value a remote source
//! delivers for one key. Scalars, ordered lists and key-value records are all
//! represented so that sequence-of-record fields can be fed from structured
//! namespaces (YAML, JSON) as well as from plain properties.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A key-value record as delivered for one element of a sequence-of-records field.
pub type ValueRecord = BTreeMap<String, ConfigValue>;

/// A dynamically-typed configuration value.
///
/// # Examples
///
/// ```
/// use hexbind::domain::config_value::{ConfigValue, ValueKind};
///
/// let value = ConfigValue::from(8888);
/// assert_eq!(value.kind(), ValueKind::Int);
///
/// let list = ConfigValue::from(vec![1, 2, 3]);
/// assert_eq!(list.kind(), ValueKind::List);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// The absence of a value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer too large for `Int`, or explicitly unsigned.
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered list of values.
    List(Vec<ConfigValue>),
    /// A key-value record.
    Record(ValueRecord),
}

/// The runtime kind of a [`ConfigValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `ConfigValue::Null`
    Null,
    /// `ConfigValue::Bool`
    Bool,
    /// `ConfigValue::Int`
    Int,
    /// `ConfigValue::UInt`
    UInt,
    /// `ConfigValue::Float`
    Float,
    /// `ConfigValue::String`
    String,
    /// `ConfigValue::List`
    List,
    /// `ConfigValue::Record`
    Record,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::UInt => "uint",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Record => "record",
        };
        f.write_str(name)
    }
}

impl ConfigValue {
    /// Returns the runtime kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            ConfigValue::Null => ValueKind::Null,
            ConfigValue::Bool(_) => ValueKind::Bool,
            ConfigValue::Int(_) => ValueKind::Int,
            ConfigValue::UInt(_) => ValueKind::UInt,
            ConfigValue::Float(_) => ValueKind::Float,
            ConfigValue::String(_) => ValueKind::String,
            ConfigValue::List(_) => ValueKind::List,
            ConfigValue::Record(_) => ValueKind::Record,
        }
    }

    /// Returns `true` for `ConfigValue::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Returns the string slice of a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements of a `List` value.
    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries of a `Record` value.
    pub fn as_record(&self) -> Option<&ValueRecord> {
        match self {
            ConfigValue::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Returns an integer value widened to `i128`, for range checked narrowing.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            ConfigValue::Int(i) => Some(i128::from(*i)),
            ConfigValue::UInt(u) => Some(i128::from(*u)),
            _ => None,
        }
    }

    /// Returns any numeric value as `f64`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConfigValue::Int(i) => Some(*i as f64),
            ConfigValue::UInt(u) => Some(*u as f64),
            ConfigValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns a numeric value as an integer when it is representable without
    /// losing information. Floats qualify only when they are finite and integral.
    pub fn as_integral(&self) -> Option<i128> {
        match self {
            ConfigValue::Float(f) if f.is_finite() && f.fract() == 0.0 => {
                let widened = *f as i128;
                (widened as f64 == *f).then_some(widened)
            }
            other => other.as_integer(),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => f.write_str("null"),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Int(i) => write!(f, "{}", i),
            ConfigValue::UInt(u) => write!(f, "{}", u),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::String(s) => f.write_str(s),
            ConfigValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            ConfigValue::Record(record) => {
                f.write_str("{")?;
                for (i, (key, value)) in record.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for ConfigValue {
            fn from(i: $t) -> Self {
                ConfigValue::Int(i64::from(i))
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for ConfigValue {
            fn from(u: $t) -> Self {
                ConfigValue::UInt(u64::from(u))
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<f32> for ConfigValue {
    fn from(f: f32) -> Self {
        ConfigValue::Float(f64::from(f))
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        ConfigValue::Float(f)
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<ValueRecord> for ConfigValue {
    fn from(record: ValueRecord) -> Self {
        ConfigValue::Record(record)
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for ConfigValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ConfigValue::Record(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(ConfigValue::Null.kind(), ValueKind::Null);
        assert_eq!(ConfigValue::from(true).kind(), ValueKind::Bool);
        assert_eq!(ConfigValue::from(-1i32).kind(), ValueKind::Int);
        assert_eq!(ConfigValue::from(1u8).kind(), ValueKind::UInt);
        assert_eq!(ConfigValue::from(1.5).kind(), ValueKind::Float);
        assert_eq!(ConfigValue::from("x").kind(), ValueKind::String);
        assert_eq!(ConfigValue::from(vec!["a"]).kind(), ValueKind::List);
        let record: ConfigValue = [("method", "GET")].into_iter().collect();
        assert_eq!(record.kind(), ValueKind::Record);
    }

    #[test]
    fn test_as_integral() {
        assert_eq!(ConfigValue::Float(10.0).as_integral(), Some(10));
        assert_eq!(ConfigValue::Float(10.5).as_integral(), None);
        assert_eq!(ConfigValue::Float(f64::NAN).as_integral(), None);
        assert_eq!(ConfigValue::UInt(u64::MAX).as_integral(), Some(u64::MAX as i128));
        assert_eq!(ConfigValue::from("10").as_integral(), None);
    }

    #[test]
    fn test_as_float_widens_integers() {
        assert_eq!(ConfigValue::Int(3).as_float(), Some(3.0));
        assert_eq!(ConfigValue::Bool(true).as_float(), None);
    }

    #[test]
    fn test_display_nested() {
        let record: ConfigValue = [("uri", ConfigValue::from("/foo")), ("time-out", 10.into())]
            .into_iter()
            .collect();
        let list = ConfigValue::List(vec![record, ConfigValue::Null]);
        assert_eq!(list.to_string(), "[{time-out: 10, uri: /foo}, null]");
    }

    #[test]
    #[cfg(feature = "yaml")]
    fn test_untagged_deserialize() {
        let value: ConfigValue =
            serde_yaml::from_str("[1, -2, 2.5, true, ~, text, {uri: /foo}]").unwrap();
        let items = value.as_list().unwrap();
        assert_eq!(items[0], ConfigValue::Int(1));
        assert_eq!(items[1], ConfigValue::Int(-2));
        assert_eq!(items[2], ConfigValue::Float(2.5));
        assert_eq!(items[3], ConfigValue::Bool(true));
        assert!(items[4].is_null());
        assert_eq!(items[5].as_str(), Some("text"));
        assert_eq!(
            items[6].as_record().unwrap().get("uri"),
            Some(&ConfigValue::from("/foo"))
        );
    }
}
