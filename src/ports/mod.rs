// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that describe the
//! collaborators of a binder: the remote source, its change listener registration,
//! document parsers and the logging capability. Adapters implement them.

pub mod listener;
pub mod logger;
pub mod parser;
pub mod source;

// Re-export commonly used types
pub use listener::ChangeListener;
pub use logger::{default_logger, Logger, NoopLogger, TracingLogger};
pub use parser::ConfigParser;
pub use source::{NamespaceConfig, RemoteSource};
