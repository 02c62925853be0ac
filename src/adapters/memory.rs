// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory remote source.
//!
//! [`MemorySource`] keeps every namespace as a map of dotted keys to values and
//! publishes added/updated/deleted change events to its registered listeners.
//! It stands in for a remote configuration service in tests and embedded
//! setups, and can be fed from namespace documents through a [`ConfigParser`].

use crate::domain::{
    readiness, ChangeEvent, ConfigChange, ConfigValue, FullChangeEvent, ReadyHandle, ReadySignal,
    Result,
};
use crate::ports::{ChangeListener, ConfigParser, NamespaceConfig, RemoteSource};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

/// One namespace held by a [`MemorySource`].
#[derive(Debug)]
pub struct MemoryNamespace {
    name: String,
    values: RwLock<BTreeMap<String, ConfigValue>>,
    ready: ReadyHandle,
}

impl MemoryNamespace {
    fn new(name: &str) -> Self {
        let (ready, _signal) = readiness();
        Self {
            name: name.to_string(),
            values: RwLock::new(BTreeMap::new()),
            ready,
        }
    }

    /// Returns the current value of `key`.
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Returns a copy of every key/value pair.
    pub fn snapshot(&self) -> BTreeMap<String, ConfigValue> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NamespaceConfig for MemoryNamespace {
    fn namespace(&self) -> &str {
        &self.name
    }

    fn is_initialized(&self) -> bool {
        self.ready.signal().is_ready()
    }

    fn readiness(&self) -> ReadySignal {
        self.ready.signal()
    }

    fn range(&self, visit: &mut dyn FnMut(&str, &ConfigValue) -> bool) {
        for (key, value) in &self.snapshot() {
            if !visit(key, value) {
                break;
            }
        }
    }
}

/// A remote source backed by process memory.
///
/// # Examples
///
/// ```rust
/// use hexbind::adapters::MemorySource;
/// use hexbind::domain::ChangeEvent;
/// use hexbind::ports::{ChangeListener, NamespaceConfig, RemoteSource};
/// use std::sync::{Arc, Mutex};
///
/// #[derive(Default)]
/// struct Recorder(Mutex<Vec<String>>);
///
/// impl ChangeListener for Recorder {
///     fn on_change(&self, event: &ChangeEvent) {
///         let mut keys = self.0.lock().unwrap();
///         keys.extend(event.changes.keys().cloned());
///     }
/// }
///
/// let source = MemorySource::new("memory");
/// let recorder = Arc::new(Recorder::default());
/// source.add_change_listener(recorder.clone());
///
/// source.set("application", "app.port", 8080);
/// source.mark_ready("application");
///
/// assert!(source.namespace("application").is_initialized());
/// assert_eq!(*recorder.0.lock().unwrap(), ["app.port"]);
/// ```
pub struct MemorySource {
    name: String,
    namespaces: RwLock<HashMap<String, Arc<MemoryNamespace>>>,
    listeners: RwLock<Vec<Arc<dyn ChangeListener>>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespaces: RwLock::new(HashMap::new()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    fn entry(&self, namespace: &str) -> Arc<MemoryNamespace> {
        if let Some(existing) = self
            .namespaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(namespace)
        {
            return Arc::clone(existing);
        }
        let mut namespaces = self
            .namespaces
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            namespaces
                .entry(namespace.to_string())
                .or_insert_with(|| Arc::new(MemoryNamespace::new(namespace))),
        )
    }

    /// Returns the state holder of `namespace`.
    pub fn memory_namespace(&self, namespace: &str) -> Arc<MemoryNamespace> {
        self.entry(namespace)
    }

    /// Marks `namespace` as initialized, waking every binder waiting on it.
    pub fn mark_ready(&self, namespace: &str) {
        tracing::debug!("namespace {} of {} is ready", namespace, self.name);
        self.entry(namespace).ready.mark_ready();
    }

    /// Sets `key` and publishes an added or updated change.
    pub fn set(&self, namespace: &str, key: &str, value: impl Into<ConfigValue>) {
        let value = value.into();
        let previous = self
            .entry(namespace)
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.clone());
        let change = match previous {
            Some(old) => ConfigChange::updated(old, value),
            None => ConfigChange::added(value),
        };
        self.publish(&ChangeEvent::new(namespace).with_change(key, change));
    }

    /// Removes `key` and publishes a deleted change if it existed.
    pub fn delete(&self, namespace: &str, key: &str) {
        let previous = self
            .entry(namespace)
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        if let Some(old) = previous {
            self.publish(&ChangeEvent::new(namespace).with_change(key, ConfigChange::deleted(Some(old))));
        }
    }

    /// Replaces the whole content of `namespace` and publishes the difference.
    pub fn replace<I>(&self, namespace: &str, values: I)
    where
        I: IntoIterator<Item = (String, ConfigValue)>,
    {
        let values: BTreeMap<String, ConfigValue> = values.into_iter().collect();
        let previous = std::mem::replace(
            &mut *self
                .entry(namespace)
                .values
                .write()
                .unwrap_or_else(PoisonError::into_inner),
            values.clone(),
        );

        let mut event = ChangeEvent::new(namespace);
        for (key, value) in &values {
            match previous.get(key) {
                None => {
                    event.changes.insert(key.clone(), ConfigChange::added(value.clone()));
                }
                Some(old) if old != value => {
                    event
                        .changes
                        .insert(key.clone(), ConfigChange::updated(old.clone(), value.clone()));
                }
                Some(_) => {}
            }
        }
        for (key, old) in previous {
            if !values.contains_key(&key) {
                event.changes.insert(key, ConfigChange::deleted(Some(old)));
            }
        }

        if !event.is_empty() {
            self.publish(&event);
        }
        self.publish_newest(&FullChangeEvent {
            namespace: namespace.to_string(),
            changes: values.into_iter().collect(),
        });
    }

    /// Parses a namespace document and replaces the content of `namespace`.
    pub fn load_document(&self, namespace: &str, parser: &dyn ConfigParser, content: &str) -> Result<()> {
        let values = parser.parse(content)?;
        self.replace(namespace, values);
        Ok(())
    }

    /// Delivers `event` to every registered listener.
    pub fn publish(&self, event: &ChangeEvent) {
        for listener in self.listeners() {
            listener.on_change(event);
        }
    }

    fn publish_newest(&self, event: &FullChangeEvent) {
        for listener in self.listeners() {
            listener.on_newest_change(event);
        }
    }

    fn listeners(&self) -> Vec<Arc<dyn ChangeListener>> {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RemoteSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self, namespace: &str) -> Arc<dyn NamespaceConfig> {
        self.entry(namespace)
    }

    fn add_change_listener(&self, listener: Arc<dyn ChangeListener>) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }
}
