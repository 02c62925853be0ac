// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the binding crate.
//!
//! This module defines the errors that can occur while indexing a target structure,
//! converting remote values into its fields, and polling remote namespaces.
//! All errors use `thiserror` for proper error handling and conversion.

use std::num::{ParseFloatError, ParseIntError};
use std::time::Duration;
use thiserror::Error;

/// The main error type for binding operations.
///
/// Construction-time errors (`MustBeStructPointer`, unparsable default literals) are
/// returned to the caller. Conversion errors raised while routing change events are
/// logged and the offending key is skipped. It is marked as `#[non_exhaustive]` to
/// allow for future additions without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use hexbind::domain::errors::ConfigError;
///
/// fn bind_port() -> Result<(), ConfigError> {
///     Err(ConfigError::CannotSet {
///         key: "app.server.port".to_string(),
///     })
/// }
///
/// assert!(bind_port().is_err());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The binding target is not a present (non-null) structured value.
    #[error("config target must be a pointer to struct and not nil")]
    MustBeStructPointer,

    /// The field behind the key cannot be written.
    #[error("field can not set, key: {key}")]
    CannotSet {
        /// The dotted key of the field
        key: String,
    },

    /// The runtime kind of the incoming value does not match the field.
    #[error("field type is not match, key: {key}, field type: {expected}, value type: {actual}")]
    TypeMismatch {
        /// The dotted key of the field
        key: String,
        /// The static type of the field
        expected: String,
        /// The runtime kind of the value
        actual: String,
    },

    /// An element of an incoming list cannot be converted to the element type.
    #[error(
        "slice element type not convertible, key: {key}, field: {field}, expected: {expected}, got: {actual}"
    )]
    SliceElementNotConvertible {
        /// The dotted key of the sequence field
        key: String,
        /// The short name of the element type
        field: String,
        /// The full element type
        expected: String,
        /// The runtime kind of the offending element
        actual: String,
    },

    /// A namespace did not become ready within the configured wait timeout.
    #[error("wait init timeout, namespace: {namespace}, timeout: {timeout:?}")]
    WaitInitTimeout {
        /// The namespace that was not ready
        namespace: String,
        /// The configured wait timeout
        timeout: Duration,
    },

    /// An integer value does not fit into the field's integer type.
    #[error("value {value} out of range for {target_type}, key: {key}")]
    ValueOutOfRange {
        /// The dotted key of the field
        key: String,
        /// The static type of the field
        target_type: String,
        /// The rejected value
        value: String,
    },

    /// Failed to convert a default literal to the field type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A namespace polling task panicked.
    #[error("polling task panicked, namespace: {namespace}: {message}")]
    TaskPanicked {
        /// The namespace whose task panicked
        namespace: String,
        /// The panic payload, when it was a string
        message: String,
    },

    /// Failed to parse a namespace document.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ConfigError {
    /// Creates a TypeConversionError from a ParseIntError.
    pub fn from_parse_int_error(key: String, err: ParseIntError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "integer".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseFloatError.
    pub fn from_parse_float_error(key: String, err: ParseFloatError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "float".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError for a literal that is not a boolean.
    ///
    /// Accepted spellings are those of [`parse_bool_literal`](crate::schema::parse_bool_literal).
    pub fn from_parse_bool_error(key: String, literal: &str) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "boolean".to_string(),
            source: format!("invalid boolean literal: {:?}", literal).into(),
        }
    }
}

/// A specialized Result type for binding operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_must_be_struct_pointer_error() {
        let error = ConfigError::MustBeStructPointer;
        assert_eq!(
            error.to_string(),
            "config target must be a pointer to struct and not nil"
        );
    }

    #[test]
    fn test_type_mismatch_error() {
        let error = ConfigError::TypeMismatch {
            key: "app.server.port".to_string(),
            expected: "i32".to_string(),
            actual: "string".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("app.server.port"));
        assert!(message.contains("i32"));
        assert!(message.contains("string"));
    }

    #[test]
    fn test_slice_element_error_names_key_and_types() {
        let error = ConfigError::SliceElementNotConvertible {
            key: "app.slice".to_string(),
            field: "Req".to_string(),
            expected: "tests::Req".to_string(),
            actual: "bool".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("app.slice"));
        assert!(message.contains("expected: tests::Req"));
        assert!(message.contains("got: bool"));
    }

    #[test]
    fn test_wait_init_timeout_error() {
        let error = ConfigError::WaitInitTimeout {
            namespace: "application".to_string(),
            timeout: Duration::from_millis(50),
        };
        assert!(error.to_string().contains("application"));
        assert!(error.to_string().contains("50ms"));
    }

    #[test]
    fn test_parse_error() {
        let error = ConfigError::ParseError {
            message: "Invalid YAML".to_string(),
            source: None,
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration: Invalid YAML"
        );
    }

    #[test]
    fn test_from_parse_int_error() {
        let parse_err = "not_a_number".parse::<i64>().unwrap_err();
        let error = ConfigError::from_parse_int_error("test.key".to_string(), parse_err);
        assert!(matches!(error, ConfigError::TypeConversionError { .. }));
        assert!(error.to_string().contains("integer"));
    }

    #[test]
    fn test_from_parse_float_error() {
        let parse_err = "not_a_float".parse::<f64>().unwrap_err();
        let error = ConfigError::from_parse_float_error("test.key".to_string(), parse_err);
        assert!(matches!(error, ConfigError::TypeConversionError { .. }));
        assert!(error.to_string().contains("float"));
    }

    #[test]
    fn test_from_parse_bool_error() {
        let error = ConfigError::from_parse_bool_error("test.key".to_string(), "maybe");
        assert!(matches!(error, ConfigError::TypeConversionError { .. }));
        assert!(error.to_string().contains("boolean"));
        assert!(error.to_string().contains("maybe"));
    }
}
