// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dotted configuration key newtype.
//!
//! This module provides the `ConfigKey` type, a newtype wrapper around `String` for
//! the `.`-joined paths that identify one field across nested structures, plus the
//! helpers that derive key segments from Rust field names.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Separator between the segments of a dotted key.
pub const KEY_SEPARATOR: &str = ".";

/// A type-safe wrapper for dotted configuration keys.
///
/// # Examples
///
/// ```
/// use hexbind::domain::config_key::ConfigKey;
///
/// let key = ConfigKey::from("app").join("server").join("port");
/// assert_eq!(key.as_str(), "app.server.port");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new `ConfigKey` from a `String`.
    pub fn new(key: String) -> Self {
        ConfigKey(key)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Appends a segment, producing `self + "." + segment`.
    ///
    /// An empty key yields the segment alone, so a configuration without a
    /// prefix does not produce keys with a leading separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexbind::domain::config_key::ConfigKey;
    ///
    /// assert_eq!(ConfigKey::from("app").join("port").as_str(), "app.port");
    /// assert_eq!(ConfigKey::from("").join("port").as_str(), "port");
    /// ```
    pub fn join(&self, segment: &str) -> ConfigKey {
        if self.0.is_empty() {
            ConfigKey(segment.to_string())
        } else {
            ConfigKey(format!("{}{}{}", self.0, KEY_SEPARATOR, segment))
        }
    }

    /// Returns the fully lowercased alias of this key, if it differs from the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexbind::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::from("app.servlet.contextPath");
    /// assert_eq!(key.lowercase_alias().unwrap().as_str(), "app.servlet.contextpath");
    /// assert!(ConfigKey::from("app.port").lowercase_alias().is_none());
    /// ```
    pub fn lowercase_alias(&self) -> Option<ConfigKey> {
        let lower = self.0.to_lowercase();
        (lower != self.0).then_some(ConfigKey(lower))
    }
}

/// Lowercases the first character of `s`.
///
/// # Examples
///
/// ```
/// use hexbind::domain::config_key::lower_first;
///
/// assert_eq!(lower_first("SimpleSlice"), "simpleSlice");
/// assert_eq!(lower_first(""), "");
/// ```
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derives the key segment of an untagged field from its Rust name.
///
/// Snake case names become lower camel case and the first character is always
/// lowercased, so both `context_path` and `ContextPath` map to `contextPath`.
///
/// # Examples
///
/// ```
/// use hexbind::domain::config_key::key_from_field_name;
///
/// assert_eq!(key_from_field_name("simple_slice"), "simpleSlice");
/// assert_eq!(key_from_field_name("Server"), "server");
/// assert_eq!(key_from_field_name("uri"), "uri");
/// ```
pub fn key_from_field_name(name: &str) -> String {
    let mut camel = String::with_capacity(name.len());
    for (i, segment) in name.split('_').filter(|s| !s.is_empty()).enumerate() {
        if i == 0 {
            camel.push_str(segment);
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            camel.extend(first.to_uppercase());
            camel.push_str(chars.as_str());
        }
    }
    lower_first(&camel)
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey(s.to_string())
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Hash for ConfigKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_key_display() {
        let key = ConfigKey::from("test.key");
        assert_eq!(format!("{}", key), "test.key");
    }

    #[test]
    fn test_config_key_hash() {
        let key1 = ConfigKey::from("test.key");
        let key2 = ConfigKey::from("test.key");
        let key3 = ConfigKey::from("other.key");

        let mut map = HashMap::new();
        map.insert(key1.clone(), "value1");

        assert_eq!(map.get(&key2), Some(&"value1"));
        assert_eq!(map.get(&key3), None);
    }

    #[test]
    fn test_join_nested() {
        let key = ConfigKey::from("app").join("server").join("servlet");
        assert_eq!(key.as_str(), "app.server.servlet");
    }

    #[test]
    fn test_join_empty_prefix() {
        assert_eq!(ConfigKey::from("").join("port").as_str(), "port");
    }

    #[test]
    fn test_lowercase_alias_only_when_different() {
        assert_eq!(
            ConfigKey::from("app.simpleSlice").lowercase_alias(),
            Some(ConfigKey::from("app.simpleslice"))
        );
        assert_eq!(ConfigKey::from("app.time-out").lowercase_alias(), None);
    }

    #[test]
    fn test_lower_first_unicode() {
        assert_eq!(lower_first("Ärger"), "ärger");
        assert_eq!(lower_first("a"), "a");
    }

    #[test]
    fn test_key_from_field_name() {
        assert_eq!(key_from_field_name("context_path"), "contextPath");
        assert_eq!(key_from_field_name("ContextPath"), "contextPath");
        assert_eq!(key_from_field_name("slice_pointer"), "slicePointer");
        assert_eq!(key_from_field_name("_private"), "private");
        assert_eq!(key_from_field_name(""), "");
    }
}
