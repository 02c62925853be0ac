// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change events delivered by a remote configuration source.
//!
//! An incremental [`ChangeEvent`] carries one record per changed key of a single
//! namespace. A [`FullChangeEvent`] carries the complete new key/value state.

use crate::domain::ConfigValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The kind of a key-level change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// The key did not exist before.
    Added,
    /// The key existed and its value changed.
    Updated,
    /// The key was removed.
    Deleted,
}

/// A change record for one key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigChange {
    /// The value before the change, if any.
    pub old_value: Option<ConfigValue>,
    /// The value after the change, absent for deletions.
    pub new_value: Option<ConfigValue>,
    /// What happened to the key.
    pub change_type: ChangeType,
}

impl ConfigChange {
    /// Creates a record for a newly added key.
    pub fn added(value: impl Into<ConfigValue>) -> Self {
        Self {
            old_value: None,
            new_value: Some(value.into()),
            change_type: ChangeType::Added,
        }
    }

    /// Creates a record for a key whose value changed.
    pub fn updated(old: impl Into<ConfigValue>, new: impl Into<ConfigValue>) -> Self {
        Self {
            old_value: Some(old.into()),
            new_value: Some(new.into()),
            change_type: ChangeType::Updated,
        }
    }

    /// Creates a record for a removed key.
    pub fn deleted(old: Option<ConfigValue>) -> Self {
        Self {
            old_value: old,
            new_value: None,
            change_type: ChangeType::Deleted,
        }
    }
}

/// A batch of key-level changes for one namespace.
///
/// # Examples
///
/// ```
/// use hexbind::domain::{ChangeEvent, ConfigChange};
///
/// let event = ChangeEvent::new("application")
///     .with_change("app.server.port", ConfigChange::added(8888));
/// assert_eq!(event.changes.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// The namespace the changes belong to.
    pub namespace: String,
    /// Change records keyed by dotted key.
    pub changes: HashMap<String, ConfigChange>,
}

impl ChangeEvent {
    /// Creates an empty event for `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            changes: HashMap::new(),
        }
    }

    /// Adds a change record for `key`.
    pub fn with_change(mut self, key: impl Into<String>, change: ConfigChange) -> Self {
        self.changes.insert(key.into(), change);
        self
    }

    /// Returns `true` when the event carries no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// The complete latest key/value state of one namespace.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FullChangeEvent {
    /// The namespace the values belong to.
    pub namespace: String,
    /// Every key with its current value.
    pub changes: HashMap<String, ConfigValue>,
}
