// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema layer: static field descriptions, value conversion and the key index.
//!
//! Records describe their fields once through [`Record::describe`]. The resulting
//! schema is cached per type and drives both the dotted-key [`Index`] of a bound
//! target and the best-effort [`materialize`] of record elements.
//!
//! # Examples
//!
//! ```
//! use hexbind::domain::ConfigValue;
//! use hexbind::ports::NoopLogger;
//! use hexbind::schema::{Configuration, Conversion, Fields, Index, Record};
//!
//! #[derive(Default)]
//! struct App {
//!     port: u16,
//! }
//!
//! impl Record for App {
//!     fn describe(fields: &mut Fields<Self>) {
//!         fields.field("port", Some("port,default:'8080'"), |a| &mut a.port);
//!     }
//! }
//!
//! impl Configuration for App {
//!     fn prefix(&self) -> &str {
//!         "app"
//!     }
//! }
//!
//! let cx = Conversion::new(false, &NoopLogger);
//! let mut app = App::default();
//! let prefix = app.prefix().to_string();
//! let index = Index::build(&prefix, &mut app, &cx).unwrap();
//! assert_eq!(app.port, 8080);
//!
//! index.get("app.port").unwrap().assign(&mut app, &ConfigValue::from(9090), &cx).unwrap();
//! assert_eq!(app.port, 9090);
//! ```

pub mod field_type;
pub mod fields;
pub mod index;
pub mod registry;
pub mod tag;
pub mod type_tag;

pub use field_type::{parse_bool_literal, Conversion, FieldType};
pub use fields::Fields;
pub use index::{FieldSlot, Index};
pub use registry::materialize;
pub use tag::{Binding, DEFAULT_MARKER, TAG_SEPARATOR};
pub use type_tag::TypeTag;

/// A structured type whose fields can be bound.
///
/// Implementations register every bindable field on the visitor. Nested records
/// must not refer back to their own type.
pub trait Record: Default + Send + Sync + 'static {
    /// Registers the fields of this record.
    fn describe(fields: &mut Fields<Self>);
}

/// A record that is bound as a whole below a key prefix.
pub trait Configuration: Record {
    /// Returns the dotted key prefix of this configuration.
    fn prefix(&self) -> &str;
}
