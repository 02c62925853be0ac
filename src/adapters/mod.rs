// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing port implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer: an in-memory remote source, the YAML namespace document parser,
//! and the `${NAME}` environment placeholder substitution used for textual values.

pub mod env_var;
pub mod memory;
#[cfg(feature = "yaml")]
pub mod yaml;

// Re-export adapters based on feature flags
pub use memory::{MemoryNamespace, MemorySource};
#[cfg(feature = "yaml")]
pub use yaml::YamlParser;
