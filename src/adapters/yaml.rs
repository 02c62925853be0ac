// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML namespace document parser.
//!
//! Namespaces named like `app.yml` are served as whole YAML documents. This
//! module flattens such a document into the dotted-key snapshot a binder
//! consumes.

use crate::domain::{ConfigError, ConfigValue, Result, ValueRecord};
use crate::ports::ConfigParser;
use serde_yaml::Value;
use std::collections::HashMap;

/// YAML parser implementation.
///
/// Mappings are flattened into dot notation keys. Sequences stay whole as
/// [`ConfigValue::List`], with mapping elements kept as [`ConfigValue::Record`],
/// so they can feed sequence-of-record fields.
///
/// # Examples
///
/// ```rust
/// use hexbind::adapters::YamlParser;
/// use hexbind::domain::ConfigValue;
/// use hexbind::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let yaml_content = "database:\n  host: localhost\n  port: 5432";
/// let result = parser.parse(yaml_content).unwrap();
/// assert_eq!(result.get("database.host"), Some(&ConfigValue::from("localhost")));
/// assert_eq!(result.get("database.port"), Some(&ConfigValue::Int(5432)));
/// ```
#[derive(Debug, Clone)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    /// Flattens a YAML value into a flat map with dot notation keys.
    fn flatten_yaml(value: &Value, prefix: &str, result: &mut HashMap<String, ConfigValue>) {
        match value {
            Value::Mapping(map) => {
                for (key, val) in map {
                    let Some(key_str) = Self::key_string(key) else {
                        continue;
                    };
                    let new_prefix = if prefix.is_empty() {
                        key_str
                    } else {
                        format!("{}.{}", prefix, key_str)
                    };
                    Self::flatten_yaml(val, &new_prefix, result);
                }
            }
            Value::Tagged(tagged) => Self::flatten_yaml(&tagged.value, prefix, result),
            other if !prefix.is_empty() => {
                result.insert(prefix.to_string(), Self::to_value(other));
            }
            _ => {}
        }
    }

    fn key_string(key: &Value) -> Option<String> {
        match key {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Converts a YAML value into a dynamic value without flattening.
    fn to_value(value: &Value) -> ConfigValue {
        match value {
            Value::Null => ConfigValue::Null,
            Value::Bool(b) => ConfigValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ConfigValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    ConfigValue::UInt(u)
                } else {
                    ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => ConfigValue::String(s.clone()),
            Value::Sequence(seq) => ConfigValue::List(seq.iter().map(Self::to_value).collect()),
            Value::Mapping(map) => ConfigValue::Record(
                map.iter()
                    .filter_map(|(k, v)| Self::key_string(k).map(|k| (k, Self::to_value(v))))
                    .collect::<ValueRecord>(),
            ),
            Value::Tagged(tagged) => Self::to_value(&tagged.value),
        }
    }
}

impl Default for YamlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<HashMap<String, ConfigValue>> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse YAML: {}", e),
            source: Some(Box::new(e)),
        })?;

        let mut result = HashMap::new();
        Self::flatten_yaml(&value, "", &mut result);
        Ok(result)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
