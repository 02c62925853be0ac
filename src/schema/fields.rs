// SPDX-License-Identifier: MIT OR Apache-2.0

//! The schema visitor.
//!
//! A [`Record`] describes itself once by registering each bindable field on a
//! [`Fields`] table. Every registration yields two things:
//!
//! - zero or more *leaf definitions*: the dotted path below the record, the static
//!   [`TypeTag`], the declared default and a type-erased setter. Nested records are
//!   flattened, so their leaves appear with a longer path;
//! - one *member*: the key of the field inside a key-value record and a best-effort
//!   setter, used when a record value is materialized into an element.

use crate::domain::{ConfigError, ConfigValue, Result, ValueRecord};
use crate::schema::field_type::{convert_sequence, mismatch};
use crate::schema::registry::{materialize, schema_of};
use crate::schema::{Binding, Conversion, FieldType, Record, TypeTag};
use std::fmt;
use std::sync::Arc;

/// An operation applied to one slot.
#[derive(Clone, Copy, Debug)]
pub(crate) enum SlotOp<'v> {
    /// Allocates optional holders along the path.
    Allocate,
    /// Applies a default literal.
    Default(&'v str),
    /// Assigns a value with strict conversion.
    Assign(&'v ConfigValue),
    /// Resets the field to its zero value.
    Reset,
}

/// Type-erased setter of one leaf below `R`.
pub(crate) type SlotFn<R> =
    Arc<dyn Fn(&mut R, &str, SlotOp<'_>, &Conversion<'_>) -> Result<()> + Send + Sync>;

type CoerceFn<R> = Arc<dyn Fn(&mut R, &ConfigValue) + Send + Sync>;

type Accessor<R, F> = Arc<dyn for<'a> Fn(&'a mut R) -> &'a mut F + Send + Sync>;

fn slot_fn<R, S>(apply: S) -> SlotFn<R>
where
    S: Fn(&mut R, &str, SlotOp<'_>, &Conversion<'_>) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(apply)
}

fn coerce_fn<R, S>(coerce: S) -> CoerceFn<R>
where
    S: Fn(&mut R, &ConfigValue) + Send + Sync + 'static,
{
    Arc::new(coerce)
}

fn accessor<R, F, A>(access: A) -> Accessor<R, F>
where
    A: for<'a> Fn(&'a mut R) -> &'a mut F + Send + Sync + 'static,
{
    Arc::new(access)
}

/// One leaf of a record, with its path relative to the record.
pub(crate) struct FieldDef<R> {
    pub(crate) path: Vec<String>,
    pub(crate) tag: TypeTag,
    pub(crate) default: Option<String>,
    pub(crate) apply: SlotFn<R>,
}

impl<R> Clone for FieldDef<R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            tag: self.tag.clone(),
            default: self.default.clone(),
            apply: Arc::clone(&self.apply),
        }
    }
}

struct Member<R> {
    key: String,
    coerce: CoerceFn<R>,
}

/// A default literal declared on a record registration, which has no slot to
/// receive it.
#[derive(Clone, Debug)]
pub(crate) struct IgnoredDefault {
    pub(crate) path: Vec<String>,
    pub(crate) tag: TypeTag,
    pub(crate) literal: String,
}

/// The field table of a record type, filled by [`Record::describe`].
///
/// # Examples
///
/// ```
/// use hexbind::schema::{Fields, Record};
///
/// #[derive(Default)]
/// struct Servlet {
///     context_path: String,
/// }
///
/// impl Record for Servlet {
///     fn describe(fields: &mut Fields<Self>) {
///         fields.field("context_path", None, |s| &mut s.context_path);
///     }
/// }
///
/// #[derive(Default)]
/// struct Server {
///     port: u16,
///     servlet: Servlet,
///     hosts: Vec<String>,
/// }
///
/// impl Record for Server {
///     fn describe(fields: &mut Fields<Self>) {
///         fields
///             .field("port", Some("port,default:'8080'"), |s| &mut s.port)
///             .record("servlet", None, |s| &mut s.servlet)
///             .field("hosts", None, |s| &mut s.hosts);
///     }
/// }
/// ```
pub struct Fields<R> {
    leaves: Vec<FieldDef<R>>,
    members: Vec<Member<R>>,
    ignored: Vec<IgnoredDefault>,
}

impl<R: Record> Fields<R> {
    pub(crate) fn new() -> Self {
        Self {
            leaves: Vec::new(),
            members: Vec::new(),
            ignored: Vec::new(),
        }
    }

    pub(crate) fn leaves(&self) -> &[FieldDef<R>] {
        &self.leaves
    }

    pub(crate) fn ignored_defaults(&self) -> &[IgnoredDefault] {
        &self.ignored
    }

    /// Returns the number of leaf slots below this record.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Returns `true` if no leaf has been registered.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Fills `record` from the members present in `values`, skipping absent, null
    /// and unconvertible entries.
    pub(crate) fn populate(&self, record: &mut R, values: &ValueRecord) {
        for member in &self.members {
            match values.get(&member.key) {
                Some(value) if !value.is_null() => (member.coerce)(record, value),
                _ => {}
            }
        }
    }

    fn push_leaf(&mut self, binding: &Binding, tag: TypeTag, apply: SlotFn<R>) {
        self.leaves.push(FieldDef {
            path: vec![binding.key.clone()],
            tag,
            default: binding.default.clone(),
            apply,
        });
    }

    fn push_member(&mut self, binding: &Binding, coerce: CoerceFn<R>) {
        self.members.push(Member {
            key: binding.key.clone(),
            coerce,
        });
    }

    /// Registers a scalar or sequence field.
    pub fn field<F, A>(&mut self, name: &str, tag: Option<&str>, access: A) -> &mut Self
    where
        F: FieldType,
        A: for<'a> Fn(&'a mut R) -> &'a mut F + Send + Sync + 'static,
    {
        let binding = Binding::resolve(name, tag);
        let access = accessor(access);

        let slot = Arc::clone(&access);
        self.push_leaf(
            &binding,
            F::type_tag(),
            slot_fn(move |target, key, op, cx| {
                let field = slot(target);
                match op {
                    SlotOp::Allocate => {}
                    SlotOp::Default(literal) => {
                        if let Some(value) = F::parse_default(key, literal, cx)? {
                            *field = value;
                        }
                    }
                    SlotOp::Assign(value) => *field = F::from_value(key, value, cx)?,
                    SlotOp::Reset => *field = F::default(),
                }
                Ok(())
            }),
        );
        self.push_member(
            &binding,
            coerce_fn(move |target, value| {
                if let Some(converted) = F::coerce(value) {
                    *access(target) = converted;
                }
            }),
        );
        self
    }

    /// Registers an optional field. The field is allocated when the index is built;
    /// a field the application has since set back to `None` cannot be written.
    pub fn optional<F, A>(&mut self, name: &str, tag: Option<&str>, access: A) -> &mut Self
    where
        F: FieldType,
        A: for<'a> Fn(&'a mut R) -> &'a mut Option<F> + Send + Sync + 'static,
    {
        let binding = Binding::resolve(name, tag);
        let access = accessor(access);

        let slot = Arc::clone(&access);
        self.push_leaf(
            &binding,
            TypeTag::Pointer(Box::new(F::type_tag())),
            slot_fn(move |target, key, op, cx| {
                let holder = slot(target);
                if let SlotOp::Allocate = op {
                    holder.get_or_insert_with(F::default);
                    return Ok(());
                }
                let field = holder.as_mut().ok_or_else(|| ConfigError::CannotSet {
                    key: key.to_string(),
                })?;
                match op {
                    SlotOp::Allocate => {}
                    SlotOp::Default(literal) => {
                        if let Some(value) = F::parse_default(key, literal, cx)? {
                            *field = value;
                        }
                    }
                    SlotOp::Assign(value) => *field = F::from_value(key, value, cx)?,
                    SlotOp::Reset => *field = F::default(),
                }
                Ok(())
            }),
        );
        self.push_member(
            &binding,
            coerce_fn(move |target, value| {
                if let Some(converted) = F::coerce(value) {
                    *access(target) = Some(converted);
                }
            }),
        );
        self
    }

    /// Registers a nested record. Its leaves are indexed below the field's key.
    pub fn record<C, A>(&mut self, name: &str, tag: Option<&str>, access: A) -> &mut Self
    where
        C: Record,
        A: for<'a> Fn(&'a mut R) -> &'a mut C + Send + Sync + 'static,
    {
        let binding = Binding::resolve(name, tag);
        let access = accessor(access);
        self.ignore_record_default::<C>(&binding);

        for def in schema_of::<C>().leaves() {
            let slot = Arc::clone(&access);
            let inner = Arc::clone(&def.apply);
            self.leaves.push(nest(
                &binding.key,
                def,
                slot_fn(move |target, key, op, cx| inner(slot(target), key, op, cx)),
            ));
        }
        self.push_member(
            &binding,
            coerce_fn(move |target, value| {
                if let Some(values) = value.as_record() {
                    *access(target) = materialize::<C>(values);
                }
            }),
        );
        self
    }

    /// Registers an optional nested record. It is allocated when the index is
    /// built; its leaves cannot be written once the application sets it to `None`.
    pub fn optional_record<C, A>(&mut self, name: &str, tag: Option<&str>, access: A) -> &mut Self
    where
        C: Record,
        A: for<'a> Fn(&'a mut R) -> &'a mut Option<C> + Send + Sync + 'static,
    {
        let binding = Binding::resolve(name, tag);
        let access = accessor(access);
        self.ignore_record_default::<C>(&binding);

        for def in schema_of::<C>().leaves() {
            let slot = Arc::clone(&access);
            let inner = Arc::clone(&def.apply);
            self.leaves.push(nest(
                &binding.key,
                def,
                slot_fn(move |target, key, op, cx| {
                    let holder = slot(target);
                    if let SlotOp::Allocate = op {
                        return inner(holder.get_or_insert_with(C::default), key, op, cx);
                    }
                    match holder.as_mut() {
                        Some(record) => inner(record, key, op, cx),
                        None => Err(ConfigError::CannotSet {
                            key: key.to_string(),
                        }),
                    }
                }),
            ));
        }
        self.push_member(
            &binding,
            coerce_fn(move |target, value| {
                if let Some(values) = value.as_record() {
                    *access(target) = Some(materialize::<C>(values));
                }
            }),
        );
        self
    }

    /// Registers a sequence of records, filled from lists of key-value records.
    pub fn records<C, A>(&mut self, name: &str, tag: Option<&str>, access: A) -> &mut Self
    where
        C: Record,
        A: for<'a> Fn(&'a mut R) -> &'a mut Vec<C> + Send + Sync + 'static,
    {
        let access = accessor(access);
        self.sequence_of::<C, C>(name, tag, TypeTag::record::<C>(), access, |record| record)
    }

    /// Registers a sequence of boxed records, filled from lists of key-value records.
    pub fn boxed_records<C, A>(&mut self, name: &str, tag: Option<&str>, access: A) -> &mut Self
    where
        C: Record,
        A: for<'a> Fn(&'a mut R) -> &'a mut Vec<Box<C>> + Send + Sync + 'static,
    {
        let access = accessor(access);
        let element = TypeTag::Pointer(Box::new(TypeTag::record::<C>()));
        self.sequence_of::<C, Box<C>>(name, tag, element, access, Box::new)
    }

    fn sequence_of<C, E>(
        &mut self,
        name: &str,
        tag: Option<&str>,
        element: TypeTag,
        access: Accessor<R, Vec<E>>,
        wrap: fn(C) -> E,
    ) -> &mut Self
    where
        C: Record,
        E: Send + Sync + 'static,
    {
        let binding = Binding::resolve(name, tag);
        let seq = TypeTag::Seq(Box::new(element));

        let slot = Arc::clone(&access);
        let slot_tag = seq.clone();
        self.push_leaf(
            &binding,
            seq,
            slot_fn(move |target, key, op, cx| {
                let field = slot(target);
                match op {
                    SlotOp::Allocate => {}
                    SlotOp::Default(literal) => cx.logger().warn(format_args!(
                        "unsupported type: {}, default {:?} of key {} ignored",
                        slot_tag, literal, key
                    )),
                    SlotOp::Assign(ConfigValue::List(items)) => {
                        let element = slot_tag.element().unwrap_or(&slot_tag);
                        *field = convert_sequence(key, items, element, |item| {
                            item.as_record().map(|values| wrap(materialize::<C>(values)))
                        })?;
                    }
                    SlotOp::Assign(other) => return Err(mismatch(key, &slot_tag, other)),
                    SlotOp::Reset => field.clear(),
                }
                Ok(())
            }),
        );
        self.push_member(
            &binding,
            coerce_fn(move |target, value| {
                let converted: Option<Vec<E>> = value.as_list().and_then(|items| {
                    items
                        .iter()
                        .map(|item| item.as_record().map(|values| wrap(materialize::<C>(values))))
                        .collect()
                });
                if let Some(converted) = converted {
                    *access(target) = converted;
                }
            }),
        );
        self
    }

    fn ignore_record_default<C: Record>(&mut self, binding: &Binding) {
        if let Some(literal) = &binding.default {
            self.ignored.push(IgnoredDefault {
                path: vec![binding.key.clone()],
                tag: TypeTag::record::<C>(),
                literal: literal.clone(),
            });
        }
        for nested in schema_of::<C>().ignored_defaults() {
            let mut path = Vec::with_capacity(nested.path.len() + 1);
            path.push(binding.key.clone());
            path.extend(nested.path.iter().cloned());
            self.ignored.push(IgnoredDefault {
                path,
                ..nested.clone()
            });
        }
    }
}

fn nest<R, C>(segment: &str, def: &FieldDef<C>, apply: SlotFn<R>) -> FieldDef<R> {
    let mut path = Vec::with_capacity(def.path.len() + 1);
    path.push(segment.to_string());
    path.extend(def.path.iter().cloned());
    FieldDef {
        path,
        tag: def.tag.clone(),
        default: def.default.clone(),
        apply,
    }
}

impl<R> fmt::Debug for Fields<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fields")
            .field(
                "leaves",
                &self.leaves.iter().map(|d| d.path.join(".")).collect::<Vec<_>>(),
            )
            .field(
                "members",
                &self.members.iter().map(|m| m.key.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::NoopLogger;

    #[derive(Default, Debug, PartialEq)]
    struct Req {
        method: String,
        timeout: i64,
    }

    impl Record for Req {
        fn describe(fields: &mut Fields<Self>) {
            fields
                .field("method", None, |r| &mut r.method)
                .field("timeout", Some("time-out"), |r| &mut r.timeout);
        }
    }

    #[derive(Default)]
    struct Outer {
        name: Option<String>,
        req: Req,
        spare: Option<Req>,
        reqs: Vec<Box<Req>>,
    }

    impl Record for Outer {
        fn describe(fields: &mut Fields<Self>) {
            fields
                .optional("name", Some("name,default:'demo'"), |o| &mut o.name)
                .record("req", None, |o| &mut o.req)
                .optional_record("spare", None, |o| &mut o.spare)
                .boxed_records("reqs", None, |o| &mut o.reqs);
        }
    }

    fn describe<R: Record>() -> Fields<R> {
        let mut fields = Fields::new();
        R::describe(&mut fields);
        fields
    }

    fn paths<R: Record>(fields: &Fields<R>) -> Vec<String> {
        fields.leaves().iter().map(|d| d.path.join(".")).collect()
    }

    #[test]
    fn test_nested_records_are_flattened() {
        let fields = describe::<Outer>();
        assert_eq!(
            paths(&fields),
            vec![
                "name",
                "req.method",
                "req.time-out",
                "spare.method",
                "spare.time-out",
                "reqs"
            ]
        );
        assert_eq!(fields.len(), 6);
    }

    #[test]
    fn test_optional_leaf_lifecycle() {
        let fields = describe::<Outer>();
        let def = &fields.leaves()[0];
        let cx = Conversion::new(false, &NoopLogger);
        let mut outer = Outer::default();

        (def.apply)(&mut outer, "name", SlotOp::Allocate, &cx).unwrap();
        assert_eq!(outer.name.as_deref(), Some(""));
        (def.apply)(&mut outer, "name", SlotOp::Default("demo"), &cx).unwrap();
        assert_eq!(outer.name.as_deref(), Some("demo"));

        outer.name = None;
        let err = (def.apply)(&mut outer, "name", SlotOp::Reset, &cx).unwrap_err();
        assert!(matches!(err, ConfigError::CannotSet { .. }));
    }

    #[test]
    fn test_optional_record_allocates_on_first_leaf() {
        let fields = describe::<Outer>();
        let def = &fields.leaves()[3];
        let cx = Conversion::new(false, &NoopLogger);
        let mut outer = Outer::default();

        (def.apply)(&mut outer, "spare.method", SlotOp::Allocate, &cx).unwrap();
        (def.apply)(&mut outer, "spare.method", SlotOp::Assign(&"PUT".into()), &cx).unwrap();
        assert_eq!(outer.spare.as_ref().map(|r| r.method.as_str()), Some("PUT"));
    }

    #[test]
    fn test_populate_by_tag_key() {
        let fields = describe::<Req>();
        let values: ValueRecord = [
            ("method", ConfigValue::from("GET")),
            ("time-out", ConfigValue::from(10)),
            ("timeout", ConfigValue::from(99)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let mut req = Req::default();
        fields.populate(&mut req, &values);
        assert_eq!(
            req,
            Req {
                method: "GET".to_string(),
                timeout: 10
            }
        );
    }

    #[test]
    fn test_populate_skips_null_and_unconvertible() {
        let fields = describe::<Req>();
        let mut values = ValueRecord::new();
        values.insert("method".to_string(), ConfigValue::Null);
        values.insert("time-out".to_string(), ConfigValue::from("ten"));

        let mut req = Req::default();
        fields.populate(&mut req, &values);
        assert_eq!(req, Req::default());
    }

    #[test]
    fn test_record_sequence_rejects_scalars() {
        let fields = describe::<Outer>();
        let def = &fields.leaves()[5];
        let cx = Conversion::new(false, &NoopLogger);
        let mut outer = Outer::default();

        let list = ConfigValue::List(vec![ConfigValue::from(1)]);
        let err = (def.apply)(&mut outer, "reqs", SlotOp::Assign(&list), &cx).unwrap_err();
        match err {
            ConfigError::SliceElementNotConvertible { field, actual, .. } => {
                assert_eq!(field, "Req");
                assert_eq!(actual, "int");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = (def.apply)(&mut outer, "reqs", SlotOp::Assign(&"x".into()), &cx).unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { .. }));
    }
}
