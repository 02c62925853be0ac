// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration binder.
//!
//! A [`ConfigBinder`] owns the dotted-key index of one target and routes change
//! events and namespace snapshots into it. The target itself stays shared with
//! the application through an `Arc<RwLock<T>>`; every mutation takes the write
//! lock.

use crate::domain::{BinderOptions, ChangeEvent, ChangeType, ConfigValue, Result};
use crate::ports::{ChangeListener, Logger, NamespaceConfig};
use crate::schema::{Configuration, Conversion, Index};
use crate::service::poll::panic_message;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// Binds a flat, dotted-key namespace onto a [`Configuration`] and keeps it live.
///
/// # Examples
///
/// ```rust
/// use hexbind::domain::{ChangeEvent, ConfigChange};
/// use hexbind::ports::ChangeListener;
/// use hexbind::schema::{Configuration, Fields, Record};
/// use hexbind::service::ConfigBinder;
/// use std::sync::{Arc, RwLock};
///
/// #[derive(Default)]
/// struct Server {
///     port: i32,
/// }
///
/// impl Record for Server {
///     fn describe(fields: &mut Fields<Self>) {
///         fields.field("port", None, |s| &mut s.port);
///     }
/// }
///
/// #[derive(Default)]
/// struct App {
///     server: Server,
/// }
///
/// impl Record for App {
///     fn describe(fields: &mut Fields<Self>) {
///         fields.record("server", None, |a| &mut a.server);
///     }
/// }
///
/// impl Configuration for App {
///     fn prefix(&self) -> &str {
///         "app"
///     }
/// }
///
/// # fn main() -> hexbind::domain::Result<()> {
/// let app = Arc::new(RwLock::new(App::default()));
/// let binder = ConfigBinder::builder(Arc::clone(&app)).build()?;
///
/// binder.on_change(
///     &ChangeEvent::new("application").with_change("app.server.port", ConfigChange::added(8888)),
/// );
/// assert_eq!(binder.read().server.port, 8888);
/// # Ok(())
/// # }
/// ```
pub struct ConfigBinder<T: Configuration> {
    target: Arc<RwLock<T>>,
    index: Index<T>,
    options: BinderOptions,
}

impl<T: Configuration> ConfigBinder<T> {
    /// Indexes `target` and creates a binder with the given options.
    ///
    /// Optional holders of the target are allocated and declared defaults are
    /// applied before this returns. Fails if a default literal cannot be parsed.
    pub fn new(target: Arc<RwLock<T>>, options: BinderOptions) -> Result<Self> {
        let options = options.resolve();
        let index = {
            let mut guard = target.write().unwrap_or_else(PoisonError::into_inner);
            let prefix = guard.prefix().to_string();
            let cx = Conversion::new(options.replace_env(), options.logger().as_ref());
            Index::build(&prefix, &mut *guard, &cx)?
        };

        tracing::debug!(
            "bound {} with {} keys, tracking namespaces {:?}",
            std::any::type_name::<T>(),
            index.len(),
            options.namespaces()
        );

        Ok(Self {
            target,
            index,
            options,
        })
    }

    /// Creates a builder for a binder of `target`.
    pub fn builder(target: Arc<RwLock<T>>) -> ConfigBinderBuilder<T> {
        ConfigBinderBuilder::new(target)
    }

    /// Returns the shared target.
    pub fn target(&self) -> &Arc<RwLock<T>> {
        &self.target
    }

    /// Locks the target for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.target.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.target.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clears the poisoning a contained panic left on the shared target, so the
    /// application keeps reading it normally.
    pub(crate) fn recover_target(&self) {
        if self.target.is_poisoned() {
            tracing::debug!("clearing poisoned target lock");
            self.target.clear_poison();
        }
    }

    /// Returns `true` if `key` resolves to a field of the target.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains(key)
    }

    /// Returns the dotted-key index of the target.
    pub fn index(&self) -> &Index<T> {
        &self.index
    }

    /// Returns the tracked namespaces.
    pub fn namespaces(&self) -> &[String] {
        self.options.namespaces()
    }

    /// Returns the resolved options.
    pub fn options(&self) -> &BinderOptions {
        &self.options
    }

    /// Returns the bound readiness timeout.
    pub fn wait_timeout(&self) -> Duration {
        self.options.wait_timeout()
    }

    pub(crate) fn logger(&self) -> &dyn Logger {
        self.options.logger().as_ref()
    }

    fn conversion(&self) -> Conversion<'_> {
        Conversion::new(self.options.replace_env(), self.logger())
    }

    /// Applies an incremental change event.
    ///
    /// Events of untracked namespaces are ignored. Deleted keys reset their field
    /// to its zero value; other keys are converted and assigned. A key that fails
    /// is logged and skipped without affecting the rest of the event.
    pub fn handle_change(&self, event: &ChangeEvent) {
        if !self.options.tracks(&event.namespace) {
            tracing::debug!("ignoring change event of namespace {}", event.namespace);
            return;
        }

        let cx = self.conversion();
        let null = ConfigValue::Null;
        let mut target = self.write();
        for (key, change) in &event.changes {
            let Some(slot) = self.index.get(key) else {
                continue;
            };
            let applied = match change.change_type {
                ChangeType::Deleted => slot.reset(&mut target, &cx),
                ChangeType::Added | ChangeType::Updated => {
                    slot.assign(&mut target, change.new_value.as_ref().unwrap_or(&null), &cx)
                }
            };
            if let Err(e) = applied {
                self.logger().error(format_args!(
                    "skipping key {} of namespace {}: {}",
                    key, event.namespace, e
                ));
            }
        }
    }

    /// Applies every indexed key of a namespace snapshot.
    ///
    /// Stops at the first key that fails to convert and returns its error; keys
    /// visited before it stay applied.
    pub fn apply_snapshot(&self, config: &dyn NamespaceConfig) -> Result<()> {
        let cx = self.conversion();
        let mut target = self.write();
        let mut outcome = Ok(());
        config.range(&mut |key, value| {
            let Some(slot) = self.index.get(key) else {
                return true;
            };
            match slot.assign(&mut target, value, &cx) {
                Ok(()) => true,
                Err(e) => {
                    self.logger().error(format_args!(
                        "applying namespace {} stopped at key {}: {}",
                        config.namespace(),
                        key,
                        e
                    ));
                    outcome = Err(e);
                    false
                }
            }
        });
        outcome
    }
}

impl<T: Configuration> ChangeListener for ConfigBinder<T> {
    fn on_change(&self, event: &ChangeEvent) {
        let handled = panic::catch_unwind(AssertUnwindSafe(|| self.handle_change(event)));
        if let Err(payload) = handled {
            self.recover_target();
            self.logger().error(format_args!(
                "panic while handling changes of namespace {}: {}",
                event.namespace,
                panic_message(payload.as_ref())
            ));
        }
    }
}

/// Builder for constructing a [`ConfigBinder`].
///
/// # Examples
///
/// ```rust
/// use hexbind::schema::{Configuration, Fields, Record};
/// use hexbind::service::ConfigBinderBuilder;
/// use std::sync::{Arc, RwLock};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct App {
///     name: String,
/// }
///
/// impl Record for App {
///     fn describe(fields: &mut Fields<Self>) {
///         fields.field("name", Some("name,default:'demo'"), |a| &mut a.name);
///     }
/// }
///
/// impl Configuration for App {
///     fn prefix(&self) -> &str {
///         "app"
///     }
/// }
///
/// # fn main() -> hexbind::domain::Result<()> {
/// let binder = ConfigBinderBuilder::new(Arc::new(RwLock::new(App::default())))
///     .with_extra_namespaces(["app.yml"])
///     .with_wait_timeout(Duration::from_secs(1))
///     .build()?;
///
/// assert_eq!(binder.namespaces(), ["application", "app.yml"]);
/// assert_eq!(binder.read().name, "demo");
/// # Ok(())
/// # }
/// ```
pub struct ConfigBinderBuilder<T: Configuration> {
    target: Arc<RwLock<T>>,
    options: BinderOptions,
}

impl<T: Configuration> ConfigBinderBuilder<T> {
    /// Creates a builder with default options.
    pub fn new(target: Arc<RwLock<T>>) -> Self {
        Self {
            target,
            options: BinderOptions::new(),
        }
    }

    /// Replaces all options.
    pub fn with_options(mut self, options: BinderOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds namespaces to track.
    pub fn with_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = self.options.with_namespaces(namespaces);
        self
    }

    /// Tracks the default namespace plus `extra`.
    pub fn with_extra_namespaces<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = self.options.with_extra_namespaces(extra);
        self
    }

    /// Sets how long polling waits for a namespace to become ready.
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.with_wait_timeout(timeout);
        self
    }

    /// Enables or disables `${NAME}` substitution in textual values.
    pub fn with_replace_env(mut self, enabled: bool) -> Self {
        self.options = self.options.with_replace_env(enabled);
        self
    }

    /// Injects the logger for conversion failures.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.options = self.options.with_logger(logger);
        self
    }

    /// Indexes the target and builds the binder.
    pub fn build(self) -> Result<ConfigBinder<T>> {
        ConfigBinder::new(self.target, self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{readiness, ConfigChange, ConfigError, ReadySignal};
    use crate::schema::{Fields, Record};
    use std::sync::Mutex;

    #[derive(Default)]
    struct App {
        port: i32,
        name: String,
    }

    impl Record for App {
        fn describe(fields: &mut Fields<Self>) {
            fields
                .field("port", None, |a| &mut a.port)
                .field("name", Some("name,default:'demo'"), |a| &mut a.name);
        }
    }

    impl Configuration for App {
        fn prefix(&self) -> &str {
            "app"
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        errors: Mutex<Vec<String>>,
    }

    impl Logger for RecordingLogger {
        fn error(&self, args: std::fmt::Arguments<'_>) {
            self.errors.lock().unwrap().push(args.to_string());
        }

        fn warn(&self, _args: std::fmt::Arguments<'_>) {}
    }

    struct Snapshot(Vec<(&'static str, ConfigValue)>, ReadySignal);

    impl NamespaceConfig for Snapshot {
        fn namespace(&self) -> &str {
            "application"
        }

        fn is_initialized(&self) -> bool {
            true
        }

        fn readiness(&self) -> ReadySignal {
            self.1.clone()
        }

        fn range(&self, visit: &mut dyn FnMut(&str, &ConfigValue) -> bool) {
            for (key, value) in &self.0 {
                if !visit(key, value) {
                    break;
                }
            }
        }
    }

    fn binder(logger: Arc<dyn Logger>) -> ConfigBinder<App> {
        ConfigBinder::builder(Arc::new(RwLock::new(App::default())))
            .with_logger(logger)
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults_applied_at_construction() {
        let binder = binder(Arc::new(RecordingLogger::default()));
        assert_eq!(binder.read().name, "demo");
        assert!(binder.contains("app.port"));
        assert_eq!(binder.namespaces(), ["application"]);
    }

    #[test]
    fn test_failing_key_is_skipped() {
        let logger = Arc::new(RecordingLogger::default());
        let binder = binder(logger.clone());
        binder.handle_change(
            &ChangeEvent::new("application")
                .with_change("app.port", ConfigChange::added("not a number"))
                .with_change("app.name", ConfigChange::updated("demo", "svc")),
        );

        assert_eq!(binder.read().port, 0);
        assert_eq!(binder.read().name, "svc");
        let errors = logger.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("app.port"));
    }

    #[test]
    fn test_snapshot_stops_at_first_error() {
        let logger = Arc::new(RecordingLogger::default());
        let binder = binder(logger.clone());
        let (_handle, signal) = readiness();
        let snapshot = Snapshot(
            vec![
                ("app.port", ConfigValue::from(1)),
                ("app.name", ConfigValue::from(2)),
                ("app.port", ConfigValue::from(3)),
            ],
            signal,
        );

        let err = binder.apply_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { .. }));
        assert_eq!(binder.read().port, 1);
        assert_eq!(logger.errors.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_deleted_value_resets() {
        let binder = binder(Arc::new(RecordingLogger::default()));
        binder.handle_change(
            &ChangeEvent::new("application").with_change("app.name", ConfigChange::deleted(None)),
        );
        assert_eq!(binder.read().name, "");
    }
}
