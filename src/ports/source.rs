// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote configuration source trait definitions.
//!
//! This module defines the collaborator contract a remote configuration service
//! client must satisfy for binders to consume it: per-namespace readiness, a
//! traversable key/value snapshot, and a listener registration point. Transport,
//! long polling and local persistence stay behind these traits.

use crate::domain::{ConfigValue, ReadySignal};
use crate::ports::ChangeListener;
use std::sync::Arc;

/// The current state of one namespace as held by a remote source.
///
/// # Examples
///
/// ```rust
/// use hexbind::domain::{readiness, ConfigValue, ReadySignal};
/// use hexbind::ports::NamespaceConfig;
///
/// struct Fixed(ReadySignal);
///
/// impl NamespaceConfig for Fixed {
///     fn namespace(&self) -> &str {
///         "application"
///     }
///
///     fn is_initialized(&self) -> bool {
///         true
///     }
///
///     fn readiness(&self) -> ReadySignal {
///         self.0.clone()
///     }
///
///     fn range(&self, visit: &mut dyn FnMut(&str, &ConfigValue) -> bool) {
///         visit("app.server.port", &ConfigValue::from(8080));
///     }
/// }
///
/// let (_handle, signal) = readiness();
/// let mut keys = Vec::new();
/// Fixed(signal).range(&mut |key, _| {
///     keys.push(key.to_string());
///     true
/// });
/// assert_eq!(keys, ["app.server.port"]);
/// ```
pub trait NamespaceConfig: Send + Sync {
    /// Returns the namespace identifier.
    fn namespace(&self) -> &str;

    /// Returns `true` once the namespace finished its initial load.
    fn is_initialized(&self) -> bool;

    /// Returns a signal that completes when the namespace finished its initial load.
    fn readiness(&self) -> ReadySignal;

    /// Visits every key/value pair of the snapshot until `visit` returns `false`.
    fn range(&self, visit: &mut dyn FnMut(&str, &ConfigValue) -> bool);
}

/// A remote configuration source.
///
/// Implementations must be `Send + Sync`; binders poll namespaces from several
/// tasks at once.
pub trait RemoteSource: Send + Sync {
    /// Returns the name of this source, used in logs.
    fn name(&self) -> &str;

    /// Returns the state holder of `namespace`, creating an uninitialized one if
    /// the source does not know it yet.
    fn namespace(&self, namespace: &str) -> Arc<dyn NamespaceConfig>;

    /// Registers a listener that receives every subsequent change event.
    fn add_change_listener(&self, listener: Arc<dyn ChangeListener>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ports_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn NamespaceConfig>();
        assert_send_sync::<dyn RemoteSource>();
    }
}
