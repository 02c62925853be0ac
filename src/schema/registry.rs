// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide cache of record schemas.

use crate::domain::ValueRecord;
use crate::schema::{Fields, Record};
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

type Erased = Arc<dyn Any + Send + Sync>;

static SCHEMAS: Lazy<RwLock<HashMap<TypeId, Erased>>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the schema of `R`, describing it on first use.
pub(crate) fn schema_of<R: Record>() -> Arc<Fields<R>> {
    let id = TypeId::of::<R>();
    let cached = SCHEMAS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .cloned();
    if let Some(schema) = cached.and_then(|erased| erased.downcast::<Fields<R>>().ok()) {
        return schema;
    }

    // Described outside the lock: nested records resolve their own schemas.
    let mut fields = Fields::new();
    R::describe(&mut fields);
    let built = Arc::new(fields);

    let erased = SCHEMAS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(id)
        .or_insert_with(|| Arc::clone(&built) as Erased)
        .clone();
    erased.downcast::<Fields<R>>().unwrap_or(built)
}

/// Builds a record of type `R` from a key-value record.
///
/// Every field whose key is present with a non-null, convertible value is set;
/// everything else keeps its zero value. Never fails.
///
/// # Examples
///
/// ```
/// use hexbind::domain::{ConfigValue, ValueRecord};
/// use hexbind::schema::{materialize, Fields, Record};
///
/// #[derive(Default)]
/// struct Req {
///     method: String,
///     timeout: u32,
/// }
///
/// impl Record for Req {
///     fn describe(fields: &mut Fields<Self>) {
///         fields
///             .field("method", None, |r| &mut r.method)
///             .field("timeout", Some("time-out"), |r| &mut r.timeout);
///     }
/// }
///
/// let values: ValueRecord = [("method", ConfigValue::from("GET")), ("time-out", ConfigValue::from(10))]
///     .into_iter()
///     .map(|(k, v)| (k.to_string(), v))
///     .collect();
/// let req: Req = materialize(&values);
/// assert_eq!(req.method, "GET");
/// assert_eq!(req.timeout, 10);
/// ```
pub fn materialize<R: Record>(values: &ValueRecord) -> R {
    let mut record = R::default();
    schema_of::<R>().populate(&mut record, values);
    record
}
