// SPDX-License-Identifier: MIT OR Apache-2.0

//! Binding tag grammar.
//!
//! A binding tag has the form `key[,default:'literal']`. The first segment is the
//! source key of the field; the optional second segment, introduced by the
//! `default:` marker, supplies a default literal with surrounding single quotes
//! stripped. Fields without a tag use their lower camel case name as key.

use crate::domain::config_key::key_from_field_name;

/// Separator between the segments of a binding tag.
pub const TAG_SEPARATOR: char = ',';

/// Marker introducing the default literal segment.
pub const DEFAULT_MARKER: &str = "default:";

/// The resolved binding of one field: its key segment and optional default literal.
///
/// # Examples
///
/// ```
/// use hexbind::schema::Binding;
///
/// let binding = Binding::resolve("timeout", Some("time-out,default:'30'"));
/// assert_eq!(binding.key, "time-out");
/// assert_eq!(binding.default.as_deref(), Some("30"));
///
/// let binding = Binding::resolve("context_path", None);
/// assert_eq!(binding.key, "contextPath");
/// assert!(binding.default.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    /// The key segment of the field.
    pub key: String,
    /// The default literal, if declared.
    pub default: Option<String>,
}

impl Binding {
    /// Resolves the binding of the field `name` with an optional tag.
    ///
    /// An empty key segment falls back to the derived field key. The default
    /// segment may itself contain commas.
    pub fn resolve(name: &str, tag: Option<&str>) -> Binding {
        let Some(tag) = tag else {
            return Binding {
                key: key_from_field_name(name),
                default: None,
            };
        };

        let mut segments = tag.splitn(2, TAG_SEPARATOR);
        let key = match segments.next().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => key_from_field_name(name),
        };
        let default = segments
            .next()
            .map(str::trim)
            .and_then(|segment| segment.strip_prefix(DEFAULT_MARKER))
            .map(|literal| literal.trim_matches('\'').to_string());

        Binding { key, default }
    }
}
