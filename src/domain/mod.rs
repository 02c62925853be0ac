// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types.
//!
//! This module contains the fundamental concepts shared by every other layer:
//! dotted keys, dynamic values, change events, readiness signals, binder options
//! and the error taxonomy. It does not depend on any concrete source.

pub mod change;
pub mod config_key;
pub mod config_value;
pub mod errors;
pub mod options;
pub mod readiness;

// Re-export commonly used types
pub use change::{ChangeEvent, ChangeType, ConfigChange, FullChangeEvent};
pub use config_key::ConfigKey;
pub use config_value::{ConfigValue, ValueKind, ValueRecord};
pub use errors::{ConfigError, Result};
pub use options::{BinderOptions, DEFAULT_NAMESPACE, DEFAULT_WAIT_TIMEOUT};
pub use readiness::{readiness, ReadyHandle, ReadySignal};
