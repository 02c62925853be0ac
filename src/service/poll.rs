// SPDX-License-Identifier: MIT OR Apache-2.0

//! Initial polling of the tracked namespaces.
//!
//! Every tracked namespace is polled on its own tokio task: the task waits, up
//! to the configured timeout, for the namespace to finish its initial load and
//! then applies its snapshot. A failing or panicking task never affects its
//! siblings; its outcome is reported as a [`NamespacePoll`].

use crate::domain::{BinderOptions, ConfigError, Result};
use crate::ports::{ChangeListener, RemoteSource};
use crate::schema::Configuration;
use crate::service::ConfigBinder;
use std::any::Any;
use std::sync::{Arc, RwLock};
use tokio::task::JoinError;

/// The outcome of polling one namespace.
#[derive(Debug)]
pub struct NamespacePoll {
    /// The polled namespace.
    pub namespace: String,
    /// `Ok` once the snapshot was applied.
    pub result: Result<()>,
}

impl NamespacePoll {
    /// Returns `true` if the snapshot was applied.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

impl<T: Configuration> ConfigBinder<T> {
    /// Polls every tracked namespace of `source` concurrently and returns once
    /// all of them finished, in namespace order.
    ///
    /// Failures are logged and reported per namespace.
    pub async fn poll(self: &Arc<Self>, source: Arc<dyn RemoteSource>) -> Vec<NamespacePoll> {
        let tasks: Vec<_> = self
            .namespaces()
            .iter()
            .map(|namespace| {
                let binder = Arc::clone(self);
                let source = Arc::clone(&source);
                let name = namespace.clone();
                let task =
                    tokio::spawn(async move { binder.poll_namespace(source.as_ref(), &name).await });
                (namespace.clone(), task)
            })
            .collect();

        let mut polls = Vec::with_capacity(tasks.len());
        for (namespace, task) in tasks {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => {
                    self.recover_target();
                    Err(task_failure(&namespace, e))
                }
            };
            match &result {
                Ok(()) => tracing::debug!("namespace {} of {} applied", namespace, source.name()),
                // Conversion failures were reported by the snapshot pass.
                Err(e @ (ConfigError::WaitInitTimeout { .. } | ConfigError::TaskPanicked { .. })) => {
                    self.logger().error(format_args!(
                        "polling namespace {} of {} failed: {}",
                        namespace,
                        source.name(),
                        e
                    ))
                }
                Err(e) => tracing::debug!(
                    "namespace {} of {} partially applied: {}",
                    namespace,
                    source.name(),
                    e
                ),
            }
            polls.push(NamespacePoll { namespace, result });
        }
        polls
    }

    /// Waits for `namespace` to become ready and applies its snapshot.
    ///
    /// Fails with [`ConfigError::WaitInitTimeout`] if the namespace is not ready
    /// within the wait timeout.
    pub async fn poll_namespace(&self, source: &dyn RemoteSource, namespace: &str) -> Result<()> {
        let config = source.namespace(namespace);
        if !config.is_initialized() {
            let timeout = self.wait_timeout();
            if tokio::time::timeout(timeout, config.readiness().wait())
                .await
                .is_err()
            {
                return Err(ConfigError::WaitInitTimeout {
                    namespace: namespace.to_string(),
                    timeout,
                });
            }
        }
        self.apply_snapshot(config.as_ref())
    }

    /// Registers a new binder of `target` as listener of `source` and polls its
    /// namespaces.
    ///
    /// The target is fully indexed before the listener is registered.
    pub async fn register(
        source: Arc<dyn RemoteSource>,
        target: Arc<RwLock<T>>,
        options: BinderOptions,
    ) -> Result<(Arc<Self>, Vec<NamespacePoll>)> {
        let binder = Arc::new(ConfigBinder::new(target, options)?);
        source.add_change_listener(Arc::clone(&binder) as Arc<dyn ChangeListener>);
        let polls = binder.poll(source).await;
        Ok((binder, polls))
    }
}

fn task_failure(namespace: &str, err: JoinError) -> ConfigError {
    let message = if err.is_panic() {
        panic_message(err.into_panic().as_ref())
    } else {
        err.to_string()
    };
    ConfigError::TaskPanicked {
        namespace: namespace.to_string(),
        message,
    }
}

/// Extracts the message of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
