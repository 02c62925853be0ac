// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registration of several configurations at once.
//!
//! A [`ConfigurationGroup`] is a parent structure whose members are each bound
//! as an independent [`Configuration`]. [`register_group`] builds one binder per
//! member, registers all of them with the source and polls them concurrently.

use crate::domain::{BinderOptions, ConfigError, Result};
use crate::ports::{ChangeListener, RemoteSource};
use crate::schema::Configuration;
use crate::service::poll::{panic_message, NamespacePoll};
use crate::service::ConfigBinder;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

/// Future returned by [`BoundConfiguration::poll_boxed`].
pub type PollFuture = Pin<Box<dyn Future<Output = Vec<NamespacePoll>> + Send>>;

/// A parent structure holding several configurations.
///
/// # Examples
///
/// ```rust
/// use hexbind::schema::{Configuration, Fields, Record};
/// use hexbind::service::{ConfigurationGroup, GroupMembers};
/// use std::sync::{Arc, RwLock};
///
/// #[derive(Default)]
/// struct Db {
///     url: String,
/// }
///
/// impl Record for Db {
///     fn describe(fields: &mut Fields<Self>) {
///         fields.field("url", None, |d| &mut d.url);
///     }
/// }
///
/// impl Configuration for Db {
///     fn prefix(&self) -> &str {
///         "db"
///     }
/// }
///
/// struct Services {
///     primary: Arc<RwLock<Db>>,
///     replica: Option<Arc<RwLock<Db>>>,
/// }
///
/// impl ConfigurationGroup for Services {
///     fn members(&self, members: &mut GroupMembers<'_>) {
///         members
///             .member(Some(Arc::clone(&self.primary)))
///             .member(self.replica.clone());
///     }
/// }
/// ```
pub trait ConfigurationGroup: Send + Sync {
    /// Enumerates the members of the group.
    fn members(&self, members: &mut GroupMembers<'_>);
}

/// A binder of any configuration type.
pub trait BoundConfiguration: Send + Sync {
    /// Returns the key prefix of the bound configuration.
    fn prefix(&self) -> String;

    /// Returns `true` if `key` resolves to a field of the configuration.
    fn contains(&self, key: &str) -> bool;

    /// Returns the binder as a change listener.
    fn listener(self: Arc<Self>) -> Arc<dyn ChangeListener>;

    /// Polls the tracked namespaces of the binder.
    fn poll_boxed(self: Arc<Self>, source: Arc<dyn RemoteSource>) -> PollFuture;
}

impl<T: Configuration> BoundConfiguration for ConfigBinder<T> {
    fn prefix(&self) -> String {
        self.read().prefix().to_string()
    }

    fn contains(&self, key: &str) -> bool {
        ConfigBinder::contains(self, key)
    }

    fn listener(self: Arc<Self>) -> Arc<dyn ChangeListener> {
        self
    }

    fn poll_boxed(self: Arc<Self>, source: Arc<dyn RemoteSource>) -> PollFuture {
        Box::pin(async move { ConfigBinder::poll(&self, source).await })
    }
}

/// Collects the members of a [`ConfigurationGroup`] into binders.
pub struct GroupMembers<'a> {
    options: &'a BinderOptions,
    bound: Vec<Arc<dyn BoundConfiguration>>,
    error: Option<ConfigError>,
}

impl<'a> GroupMembers<'a> {
    fn new(options: &'a BinderOptions) -> Self {
        Self {
            options,
            bound: Vec::new(),
            error: None,
        }
    }

    /// Adds a member. A missing member fails the whole registration with
    /// [`ConfigError::MustBeStructPointer`].
    pub fn member<T: Configuration>(&mut self, target: Option<Arc<RwLock<T>>>) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        let bound = target
            .ok_or(ConfigError::MustBeStructPointer)
            .and_then(|target| ConfigBinder::new(target, self.options.clone()));
        match bound {
            Ok(binder) => self.bound.push(Arc::new(binder)),
            Err(e) => self.error = Some(e),
        }
        self
    }

    fn finish(self) -> Result<Vec<Arc<dyn BoundConfiguration>>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.bound),
        }
    }
}

/// The binders of a registered group and the outcome of their initial poll.
pub struct RegisteredGroup {
    /// One binder per member, in member order.
    pub members: Vec<Arc<dyn BoundConfiguration>>,
    /// The poll outcomes of all members, in member then namespace order.
    pub polls: Vec<NamespacePoll>,
}

/// Binds every member of `group` to `source` with the same options.
///
/// All members are indexed before any listener is registered, so a failing
/// member leaves the source untouched. Members are then polled concurrently; a
/// panic while polling one member is logged and reported without affecting the
/// others.
pub async fn register_group<G>(
    source: Arc<dyn RemoteSource>,
    group: &G,
    options: BinderOptions,
) -> Result<RegisteredGroup>
where
    G: ConfigurationGroup + ?Sized,
{
    let options = options.resolve();
    let mut members = GroupMembers::new(&options);
    group.members(&mut members);
    let members = members.finish()?;

    for member in &members {
        source.add_change_listener(Arc::clone(member).listener());
    }

    let tasks: Vec<_> = members
        .iter()
        .map(|member| {
            let prefix = member.prefix();
            let task = tokio::spawn(Arc::clone(member).poll_boxed(Arc::clone(&source)));
            (prefix, task)
        })
        .collect();

    let mut polls = Vec::new();
    for (prefix, task) in tasks {
        match task.await {
            Ok(member_polls) => polls.extend(member_polls),
            Err(e) if e.is_panic() => options.logger().error(format_args!(
                "polling configuration {} panicked: {}",
                prefix,
                panic_message(e.into_panic().as_ref())
            )),
            Err(e) => options.logger().error(format_args!(
                "polling configuration {} failed: {}",
                prefix, e
            )),
        }
    }

    Ok(RegisteredGroup { members, polls })
}
