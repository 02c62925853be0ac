// SPDX-License-Identifier: MIT OR Apache-2.0

//! Binder options.
//!
//! Options are resolved once when a binder is constructed and are immutable
//! afterwards.

use crate::ports::{default_logger, Logger};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// The namespace tracked when no namespace is configured.
pub const DEFAULT_NAMESPACE: &str = "application";

/// The readiness wait used when no positive timeout is configured.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Options controlling which namespaces a binder tracks and how it converts values.
///
/// # Examples
///
/// ```rust
/// use hexbind::domain::BinderOptions;
/// use std::time::Duration;
///
/// let options = BinderOptions::new()
///     .with_extra_namespaces(["app.yml"])
///     .with_wait_timeout(Duration::from_millis(500))
///     .with_replace_env(true);
///
/// assert_eq!(options.namespaces(), ["application", "app.yml"]);
/// assert!(options.replace_env());
/// ```
#[derive(Clone)]
pub struct BinderOptions {
    namespaces: Vec<String>,
    wait_timeout: Duration,
    replace_env: bool,
    logger: Arc<dyn Logger>,
}

impl BinderOptions {
    /// Creates options tracking only the default namespace.
    pub fn new() -> Self {
        Self {
            namespaces: Vec::new(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            replace_env: false,
            logger: default_logger(),
        }
    }

    /// Adds namespaces to track. If none are ever added, the default namespace
    /// is tracked.
    pub fn with_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespaces.extend(namespaces.into_iter().map(Into::into));
        self
    }

    /// Tracks the default namespace followed by `extra`, replacing any namespaces
    /// configured so far.
    pub fn with_extra_namespaces<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespaces = std::iter::once(DEFAULT_NAMESPACE.to_string())
            .chain(extra.into_iter().map(Into::into))
            .collect();
        self
    }

    /// Sets how long polling waits for a namespace to become ready.
    ///
    /// A zero duration selects [`DEFAULT_WAIT_TIMEOUT`].
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Enables `${NAME}` environment placeholder substitution in string values.
    pub fn with_replace_env(mut self, enabled: bool) -> Self {
        self.replace_env = enabled;
        self
    }

    /// Injects the logger used to report recovered failures.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Applies defaults: the default namespace when none is set, the default wait
    /// timeout when it is zero, and duplicate namespaces removed in order.
    pub fn resolve(mut self) -> Self {
        if self.namespaces.is_empty() {
            self.namespaces.push(DEFAULT_NAMESPACE.to_string());
        }
        let mut seen = std::collections::HashSet::new();
        self.namespaces.retain(|ns| seen.insert(ns.clone()));
        if self.wait_timeout.is_zero() {
            self.wait_timeout = DEFAULT_WAIT_TIMEOUT;
        }
        self
    }

    /// Returns the tracked namespaces.
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Returns `true` if `namespace` is tracked.
    pub fn tracks(&self, namespace: &str) -> bool {
        self.namespaces.iter().any(|ns| ns == namespace)
    }

    /// Returns the readiness wait timeout.
    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    /// Returns `true` if environment placeholders are substituted.
    pub fn replace_env(&self) -> bool {
        self.replace_env
    }

    /// Returns the injected logger.
    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }
}

impl Default for BinderOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BinderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinderOptions")
            .field("namespaces", &self.namespaces)
            .field("wait_timeout", &self.wait_timeout)
            .field("replace_env", &self.replace_env)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let options = BinderOptions::new()
            .with_wait_timeout(Duration::ZERO)
            .resolve();
        assert_eq!(options.namespaces(), [DEFAULT_NAMESPACE]);
        assert_eq!(options.wait_timeout(), DEFAULT_WAIT_TIMEOUT);
        assert!(!options.replace_env());
    }

    #[test]
    fn test_with_namespaces_replaces_default() {
        let options = BinderOptions::new()
            .with_namespaces(["app.yml", "shared"])
            .resolve();
        assert_eq!(options.namespaces(), ["app.yml", "shared"]);
        assert!(!options.tracks(DEFAULT_NAMESPACE));
    }

    #[test]
    fn test_with_namespaces_appends() {
        let options = BinderOptions::new()
            .with_namespaces(["app.yml"])
            .with_namespaces(["shared"])
            .resolve();
        assert_eq!(options.namespaces(), ["app.yml", "shared"]);
    }

    #[test]
    fn test_with_extra_namespaces_keeps_default_first() {
        let options = BinderOptions::new()
            .with_namespaces(["ignored"])
            .with_extra_namespaces(["app.yml"])
            .resolve();
        assert_eq!(options.namespaces(), [DEFAULT_NAMESPACE, "app.yml"]);
    }

    #[test]
    fn test_resolve_deduplicates_in_order() {
        let options = BinderOptions::new()
            .with_namespaces(["b", "a", "b", "a"])
            .resolve();
        assert_eq!(options.namespaces(), ["b", "a"]);
    }

    #[test]
    fn test_debug_omits_logger() {
        let rendered = format!("{:?}", BinderOptions::new());
        assert!(rendered.contains("wait_timeout"));
        assert!(!rendered.contains("logger"));
    }
}
