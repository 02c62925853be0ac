// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal architecture configuration binding crate.
//!
//! This crate binds the flat, dotted-key namespaces of a remote configuration
//! service onto strongly-typed, nested Rust structures and keeps them up to date
//! as the remote values change.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`ConfigKey`, `ConfigValue`, change events,
//!   options, readiness signals, errors)
//! - **Ports**: Trait definitions of the collaborators (`RemoteSource`,
//!   `NamespaceConfig`, `ChangeListener`, `ConfigParser`, `Logger`)
//! - **Schema**: Static field descriptions (`Record`), value conversion and the
//!   dotted-key `Index`
//! - **Adapters**: An in-memory remote source, a YAML namespace parser and
//!   environment placeholder substitution
//! - **Service**: The `ConfigBinder` routing changes into a target, the poll
//!   coordinator and group registration
//!
//! # Features
//!
//! - **Typed binding**: Strings, booleans, integers, floats, sequences, boxed and
//!   optional fields, nested records and sequences of records
//! - **Binding tags**: `key[,default:'literal']` per field
//! - **Live updates**: Added, updated and deleted keys are applied as they arrive;
//!   a failing key is logged and skipped
//! - **Case-insensitive keys**: Every key is also reachable in lowercase
//! - **Bounded initial load**: Namespaces are polled concurrently with a readiness
//!   timeout and panic isolation
//! - **Environment substitution**: Optional `${NAME}` resolution in textual values
//!
//! # Feature Flags
//!
//! - `yaml`: Enable the YAML namespace document parser (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use hexbind::prelude::*;
//! use std::sync::{Arc, RwLock};
//!
//! #[derive(Default)]
//! struct Req {
//!     method: String,
//!     timeout: u64,
//! }
//!
//! impl Record for Req {
//!     fn describe(fields: &mut Fields<Self>) {
//!         fields
//!             .field("method", None, |r| &mut r.method)
//!             .field("timeout", Some("time-out"), |r| &mut r.timeout);
//!     }
//! }
//!
//! #[derive(Default)]
//! struct App {
//!     port: u16,
//!     routes: Vec<Box<Req>>,
//! }
//!
//! impl Record for App {
//!     fn describe(fields: &mut Fields<Self>) {
//!         fields
//!             .field("port", Some("port,default:'8080'"), |a| &mut a.port)
//!             .boxed_records("routes", None, |a| &mut a.routes);
//!     }
//! }
//!
//! impl Configuration for App {
//!     fn prefix(&self) -> &str {
//!         "app"
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> hexbind::domain::Result<()> {
//! let source = Arc::new(MemorySource::new("memory"));
//! source.set("application", "app.port", 9090);
//! source.mark_ready("application");
//!
//! let app = Arc::new(RwLock::new(App::default()));
//! let (binder, polls) =
//!     ConfigBinder::register(source.clone(), Arc::clone(&app), BinderOptions::new()).await?;
//! assert!(polls.iter().all(NamespacePoll::is_ok));
//! assert_eq!(binder.read().port, 9090);
//!
//! let route: ConfigValue = [("method", "GET"), ("uri", "/foo")].into_iter().collect();
//! source.set("application", "app.routes", vec![route]);
//! assert_eq!(app.read().unwrap().routes[0].method, "GET");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod schema;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        BinderOptions, ChangeEvent, ChangeType, ConfigChange, ConfigError, ConfigKey, ConfigValue,
        Result,
    };
    pub use crate::ports::{ChangeListener, ConfigParser, Logger, NamespaceConfig, RemoteSource};
    pub use crate::schema::{Configuration, Fields, Record};
    pub use crate::service::{
        register_group, ConfigBinder, ConfigurationGroup, GroupMembers, NamespacePoll,
    };

    pub use crate::adapters::MemorySource;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlParser;
}
