// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dotted-key index of a target.
//!
//! An [`Index`] maps every dotted key of a target to its [`FieldSlot`]. It is
//! built once, before the target is shared, and never changes afterwards: only
//! the values behind the slots do.

use crate::domain::{ConfigKey, ConfigValue, Result};
use crate::schema::fields::{SlotFn, SlotOp};
use crate::schema::registry::schema_of;
use crate::schema::{Conversion, Record, TypeTag};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A writable field location of a target of type `T`, with its static type.
pub struct FieldSlot<T> {
    key: ConfigKey,
    tag: TypeTag,
    apply: SlotFn<T>,
}

impl<T> FieldSlot<T> {
    /// Returns the canonical dotted key of this slot.
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the static type of the field.
    pub fn type_tag(&self) -> &TypeTag {
        &self.tag
    }

    /// Converts `value` and stores it in the field of `target`.
    pub fn assign(&self, target: &mut T, value: &ConfigValue, cx: &Conversion<'_>) -> Result<()> {
        (self.apply)(target, self.key.as_str(), SlotOp::Assign(value), cx)
    }

    /// Resets the field of `target` to its zero value.
    pub fn reset(&self, target: &mut T, cx: &Conversion<'_>) -> Result<()> {
        (self.apply)(target, self.key.as_str(), SlotOp::Reset, cx)
    }
}

impl<T> fmt::Debug for FieldSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSlot")
            .field("key", &self.key)
            .field("tag", &self.tag)
            .finish()
    }
}

/// Mapping from dotted key to field slot.
pub struct Index<T> {
    slots: HashMap<String, Arc<FieldSlot<T>>>,
}

impl<T: Record> Index<T> {
    /// Indexes every leaf of `target` below `prefix`.
    ///
    /// Optional holders are allocated and declared defaults applied to `target`
    /// on the way. A key with uppercase characters is also reachable through its
    /// lowercase alias. Fails if a default literal cannot be parsed.
    pub fn build(prefix: &str, target: &mut T, cx: &Conversion<'_>) -> Result<Self> {
        let schema = schema_of::<T>();
        let root = ConfigKey::from(prefix);
        let mut slots = HashMap::with_capacity(schema.len() * 2);

        for def in schema.leaves() {
            let key = def
                .path
                .iter()
                .fold(root.clone(), |key, segment| key.join(segment));

            (def.apply)(target, key.as_str(), SlotOp::Allocate, cx)?;
            if let Some(literal) = &def.default {
                (def.apply)(target, key.as_str(), SlotOp::Default(literal), cx)?;
            }

            let alias = key.lowercase_alias();
            let slot = Arc::new(FieldSlot {
                key,
                tag: def.tag.clone(),
                apply: Arc::clone(&def.apply),
            });
            if let Some(alias) = alias {
                slots
                    .entry(alias.into_string())
                    .or_insert_with(|| Arc::clone(&slot));
            }
            tracing::debug!("indexed {} as {}", slot.key, slot.tag);
            slots.insert(slot.key.as_str().to_string(), slot);
        }

        for ignored in schema.ignored_defaults() {
            let key = ignored
                .path
                .iter()
                .fold(root.clone(), |key, segment| key.join(segment));
            cx.logger().warn(format_args!(
                "unsupported type: {}, default {:?} of key {} ignored",
                ignored.tag, ignored.literal, key
            ));
        }

        Ok(Self { slots })
    }
}

impl<T> Index<T> {
    /// Returns the slot of `key`, if indexed.
    pub fn get(&self, key: &str) -> Option<&FieldSlot<T>> {
        self.slots.get(key).map(Arc::as_ref)
    }

    /// Returns `true` if `key` is indexed.
    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Returns the number of indexed keys, aliases included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns every indexed key, aliases included, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Returns the number of distinct slots.
    pub fn slot_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|(key, slot)| slot.key() == key.as_str())
            .count()
    }
}

impl<T> fmt::Debug for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Index").field("slots", &self.slots).finish()
    }
}
