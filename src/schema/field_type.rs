// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value conversion into statically-typed fields.
//!
//! [`FieldType`] is implemented for every leaf type a record can bind: strings,
//! booleans, integers, floats, and `Vec`/`Box` of those. Each implementation
//! provides three conversions:
//!
//! - **strict** ([`FieldType::from_value`]), used when routing change events: the
//!   value's kind category must match the field, integers are range checked and
//!   lists are converted element by element;
//! - **lenient** ([`FieldType::coerce`]), used for sequence elements and when
//!   materializing records: any representable numeric conversion is accepted and
//!   failures yield `None`;
//! - **literal** ([`FieldType::parse_default`]), used for default literals
//!   declared in binding tags.

use crate::adapters::env_var::substitute_env_vars;
use crate::domain::{ConfigError, ConfigValue, Result};
use crate::ports::{Logger, NoopLogger};
use crate::schema::TypeTag;

/// Settings shared by every conversion of one binder.
#[derive(Clone, Copy)]
pub struct Conversion<'a> {
    replace_env: bool,
    logger: &'a dyn Logger,
}

impl<'a> Conversion<'a> {
    /// Creates a conversion context.
    pub fn new(replace_env: bool, logger: &'a dyn Logger) -> Self {
        Self {
            replace_env,
            logger,
        }
    }

    /// Returns `true` if environment placeholders are substituted.
    pub fn replace_env(&self) -> bool {
        self.replace_env
    }

    /// Returns the logger for non-fatal conversion diagnostics.
    pub fn logger(&self) -> &'a dyn Logger {
        self.logger
    }

    /// Finalizes a textual value, substituting environment placeholders if enabled.
    pub fn text(&self, value: &str) -> String {
        if self.replace_env {
            substitute_env_vars(value)
        } else {
            value.to_string()
        }
    }
}

impl Default for Conversion<'static> {
    fn default() -> Self {
        Conversion::new(false, &NoopLogger)
    }
}

/// A leaf type that can be bound to a dotted key.
pub trait FieldType: Default + Send + Sync + 'static {
    /// Returns the static type of this field type.
    fn type_tag() -> TypeTag;

    /// Converts a value delivered for `key`, requiring a matching kind category.
    fn from_value(key: &str, value: &ConfigValue, cx: &Conversion<'_>) -> Result<Self>;

    /// Converts a value on a best-effort basis.
    fn coerce(value: &ConfigValue) -> Option<Self>;

    /// Parses a default literal declared for `key`.
    ///
    /// Returns `Ok(None)` when the type has no literal form; the default
    /// implementation warns and ignores the literal.
    fn parse_default(key: &str, literal: &str, cx: &Conversion<'_>) -> Result<Option<Self>> {
        cx.logger().warn(format_args!(
            "unsupported type: {}, default {:?} of key {} ignored",
            Self::type_tag(),
            literal,
            key
        ));
        Ok(None)
    }
}

/// Builds the error for a value whose kind does not fit `expected`.
pub(crate) fn mismatch(key: &str, expected: &TypeTag, value: &ConfigValue) -> ConfigError {
    ConfigError::TypeMismatch {
        key: key.to_string(),
        expected: expected.to_string(),
        actual: value.kind().to_string(),
    }
}

/// Converts every element of a list with `convert`, failing on the first element
/// it rejects. `element` is the element type with pointer wrapping removed.
pub(crate) fn convert_sequence<E, F>(
    key: &str,
    items: &[ConfigValue],
    element: &TypeTag,
    convert: F,
) -> Result<Vec<E>>
where
    F: Fn(&ConfigValue) -> Option<E>,
{
    items
        .iter()
        .map(|item| {
            convert(item).ok_or_else(|| ConfigError::SliceElementNotConvertible {
                key: key.to_string(),
                field: element.short_name(),
                expected: element.to_string(),
                actual: item.kind().to_string(),
            })
        })
        .collect()
}

/// Parses a boolean literal.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and `0`, `f`, `F`, `FALSE`,
/// `false`, `False`.
///
/// # Examples
///
/// ```
/// use hexbind::schema::parse_bool_literal;
///
/// assert_eq!(parse_bool_literal("T"), Some(true));
/// assert_eq!(parse_bool_literal("False"), Some(false));
/// assert_eq!(parse_bool_literal("yes"), None);
/// ```
pub fn parse_bool_literal(literal: &str) -> Option<bool> {
    match literal {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl FieldType for String {
    fn type_tag() -> TypeTag {
        TypeTag::String
    }

    fn from_value(key: &str, value: &ConfigValue, cx: &Conversion<'_>) -> Result<Self> {
        match value {
            ConfigValue::String(s) => Ok(cx.text(s)),
            other => Err(mismatch(key, &Self::type_tag(), other)),
        }
    }

    fn coerce(value: &ConfigValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn parse_default(_key: &str, literal: &str, cx: &Conversion<'_>) -> Result<Option<Self>> {
        Ok(Some(cx.text(literal)))
    }
}

impl FieldType for bool {
    fn type_tag() -> TypeTag {
        TypeTag::Bool
    }

    fn from_value(key: &str, value: &ConfigValue, _cx: &Conversion<'_>) -> Result<Self> {
        match value {
            ConfigValue::Bool(b) => Ok(*b),
            other => Err(mismatch(key, &Self::type_tag(), other)),
        }
    }

    fn coerce(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn parse_default(key: &str, literal: &str, _cx: &Conversion<'_>) -> Result<Option<Self>> {
        parse_bool_literal(literal)
            .map(Some)
            .ok_or_else(|| ConfigError::from_parse_bool_error(key.to_string(), literal))
    }
}

macro_rules! integer_field_type {
    ($variant:ident: $($t:ty),*) => {
        $(impl FieldType for $t {
            fn type_tag() -> TypeTag {
                TypeTag::$variant(stringify!($t))
            }

            fn from_value(key: &str, value: &ConfigValue, _cx: &Conversion<'_>) -> Result<Self> {
                let wide = value
                    .as_integer()
                    .ok_or_else(|| mismatch(key, &Self::type_tag(), value))?;
                <$t>::try_from(wide).map_err(|_| ConfigError::ValueOutOfRange {
                    key: key.to_string(),
                    target_type: stringify!($t).to_string(),
                    value: wide.to_string(),
                })
            }

            fn coerce(value: &ConfigValue) -> Option<Self> {
                value.as_integral().and_then(|wide| <$t>::try_from(wide).ok())
            }

            fn parse_default(key: &str, literal: &str, _cx: &Conversion<'_>) -> Result<Option<Self>> {
                literal
                    .parse::<$t>()
                    .map(Some)
                    .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
            }
        })*
    };
}

integer_field_type!(Int: i8, i16, i32, i64, isize);
integer_field_type!(UInt: u8, u16, u32, u64, usize);

macro_rules! float_field_type {
    ($($t:ty),*) => {
        $(impl FieldType for $t {
            fn type_tag() -> TypeTag {
                TypeTag::Float(stringify!($t))
            }

            fn from_value(key: &str, value: &ConfigValue, _cx: &Conversion<'_>) -> Result<Self> {
                value
                    .as_float()
                    .map(|f| f as $t)
                    .ok_or_else(|| mismatch(key, &Self::type_tag(), value))
            }

            fn coerce(value: &ConfigValue) -> Option<Self> {
                value.as_float().map(|f| f as $t)
            }

            fn parse_default(key: &str, literal: &str, _cx: &Conversion<'_>) -> Result<Option<Self>> {
                literal
                    .parse::<$t>()
                    .map(Some)
                    .map_err(|e| ConfigError::from_parse_float_error(key.to_string(), e))
            }
        })*
    };
}

float_field_type!(f32, f64);

impl<E: FieldType> FieldType for Vec<E> {
    fn type_tag() -> TypeTag {
        TypeTag::Seq(Box::new(E::type_tag()))
    }

    fn from_value(key: &str, value: &ConfigValue, _cx: &Conversion<'_>) -> Result<Self> {
        match value {
            ConfigValue::List(items) => {
                convert_sequence(key, items, E::type_tag().pointee(), E::coerce)
            }
            other => Err(mismatch(key, &Self::type_tag(), other)),
        }
    }

    fn coerce(value: &ConfigValue) -> Option<Self> {
        value.as_list()?.iter().map(E::coerce).collect()
    }
}

impl<T: FieldType> FieldType for Box<T> {
    fn type_tag() -> TypeTag {
        TypeTag::Pointer(Box::new(T::type_tag()))
    }

    fn from_value(key: &str, value: &ConfigValue, cx: &Conversion<'_>) -> Result<Self> {
        T::from_value(key, value, cx).map(Box::new)
    }

    fn coerce(value: &ConfigValue) -> Option<Self> {
        T::coerce(value).map(Box::new)
    }

    fn parse_default(key: &str, literal: &str, cx: &Conversion<'_>) -> Result<Option<Self>> {
        Ok(T::parse_default(key, literal, cx)?.map(Box::new))
    }
}
