// SPDX-License-Identifier: MIT OR Apache-2.0

//! Namespace document parser trait definition.
//!
//! Remote sources serve some namespaces as whole documents (`app.yml`,
//! `app.json`). This module defines the `ConfigParser` trait that turns such a
//! document into the flat dotted-key snapshot binders consume.

use crate::domain::{ConfigValue, Result};
use std::collections::HashMap;

/// A trait for parsing namespace documents into flat snapshots.
///
/// # Key Format
///
/// Nested mappings are flattened using dot notation, while sequences stay whole
/// so they can feed sequence fields. For example a YAML document like:
///
/// ```yaml
/// app:
///   server:
///     port: 8080
///   routes:
///     - method: GET
///       uri: /foo
/// ```
///
/// is parsed into:
/// - `app.server.port` -> `8080`
/// - `app.routes` -> `[{method: GET, uri: /foo}]`
///
/// # Examples
///
/// ```rust
/// use hexbind::domain::{ConfigValue, Result};
/// use hexbind::ports::ConfigParser;
/// use std::collections::HashMap;
///
/// struct PropertiesParser;
///
/// impl ConfigParser for PropertiesParser {
///     fn parse(&self, content: &str) -> Result<HashMap<String, ConfigValue>> {
///         Ok(content
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .map(|(k, v)| (k.trim().to_string(), ConfigValue::from(v.trim())))
///             .collect())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["properties"]
///     }
/// }
///
/// let snapshot = PropertiesParser.parse("app.name = demo").unwrap();
/// assert_eq!(snapshot.get("app.name"), Some(&ConfigValue::from("demo")));
/// ```
pub trait ConfigParser: Send + Sync {
    /// Parses a namespace document into a flat key/value snapshot.
    fn parse(&self, content: &str) -> Result<HashMap<String, ConfigValue>>;

    /// Returns the namespace suffixes (without the leading dot) this parser handles.
    fn supported_extensions(&self) -> &[&str];

    /// Returns `true` if the namespace name carries one of the supported suffixes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use hexbind::domain::{ConfigValue, Result};
    /// # use hexbind::ports::ConfigParser;
    /// # use std::collections::HashMap;
    /// # struct YmlParser;
    /// # impl ConfigParser for YmlParser {
    /// #     fn parse(&self, _: &str) -> Result<HashMap<String, ConfigValue>> { Ok(HashMap::new()) }
    /// #     fn supported_extensions(&self) -> &[&str] { &["yaml", "yml"] }
    /// # }
    /// assert!(YmlParser.handles("app.yml"));
    /// assert!(!YmlParser.handles("application"));
    /// ```
    fn handles(&self, namespace: &str) -> bool {
        namespace
            .rsplit_once('.')
            .map(|(_, ext)| self.supported_extensions().contains(&ext))
            .unwrap_or(false)
    }
}
