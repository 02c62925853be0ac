// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change listener trait definition.
//!
//! This module defines the `ChangeListener` trait, the registration point a remote
//! source calls whenever the keys of a namespace change.

use crate::domain::{ChangeEvent, FullChangeEvent};

/// A trait for receiving change events from a remote source.
///
/// Sources must not invoke `on_change` concurrently for the same listener;
/// implementations still have to be `Send + Sync` because the source delivers
/// events from its own threads.
///
/// # Examples
///
/// ```rust
/// use hexbind::domain::ChangeEvent;
/// use hexbind::ports::ChangeListener;
///
/// struct PrintListener;
///
/// impl ChangeListener for PrintListener {
///     fn on_change(&self, event: &ChangeEvent) {
///         println!("{} keys changed in {}", event.changes.len(), event.namespace);
///     }
/// }
/// ```
pub trait ChangeListener: Send + Sync {
    /// Handles an incremental batch of key changes.
    fn on_change(&self, event: &ChangeEvent);

    /// Handles the complete latest state of a namespace.
    ///
    /// Binders react to incremental events only, so the default does nothing.
    fn on_newest_change(&self, _event: &FullChangeEvent) {}
}
