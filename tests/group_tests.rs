// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for group registration.

mod common;

use common::{init_tracing, Defaults, TestConfig};
use hexbind::prelude::*;
use std::sync::{Arc, RwLock};
use std::time::Duration;

struct Parent {
    app: Arc<RwLock<TestConfig>>,
    svc: Option<Arc<RwLock<Defaults>>>,
}

impl Parent {
    fn new() -> Self {
        Self {
            app: Arc::new(RwLock::new(TestConfig::default())),
            svc: Some(Arc::new(RwLock::new(Defaults::default()))),
        }
    }
}

impl ConfigurationGroup for Parent {
    fn members(&self, members: &mut GroupMembers<'_>) {
        members
            .member(Some(Arc::clone(&self.app)))
            .member(self.svc.clone());
    }
}

/// Counts registered listeners without delivering anything.
struct CountingSource {
    inner: MemorySource,
    registered: RwLock<usize>,
}

impl RemoteSource for CountingSource {
    fn name(&self) -> &str {
        "counting"
    }

    fn namespace(&self, namespace: &str) -> Arc<dyn NamespaceConfig> {
        self.inner.namespace(namespace)
    }

    fn add_change_listener(&self, listener: Arc<dyn ChangeListener>) {
        *self.registered.write().unwrap() += 1;
        self.inner.add_change_listener(listener);
    }
}

#[tokio::test]
async fn test_every_member_is_bound_and_polled() {
    init_tracing();
    let source = Arc::new(MemorySource::new("memory"));
    source.set("application", "app.server.port", 8080);
    source.set("application", "svc.name", "checkout");
    source.mark_ready("application");

    let parent = Parent::new();
    let group = register_group(source.clone(), &parent, BinderOptions::new())
        .await
        .unwrap();

    assert_eq!(group.members.len(), 2);
    assert_eq!(group.members[0].prefix(), "app");
    assert_eq!(group.members[1].prefix(), "svc");
    assert!(group.members[1].contains("svc.backup.port"));
    assert_eq!(group.polls.len(), 2);
    assert!(group.polls.iter().all(NamespacePoll::is_ok));

    assert_eq!(parent.app.read().unwrap().server.port, 8080);
    let svc = parent.svc.as_ref().unwrap();
    assert_eq!(svc.read().unwrap().name, "checkout");
    assert_eq!(svc.read().unwrap().retries, 3);

    source.set("application", "svc.retries", 5);
    source.set("application", "app.server.port", 9090);
    assert_eq!(svc.read().unwrap().retries, 5);
    assert_eq!(parent.app.read().unwrap().server.port, 9090);
}

#[tokio::test]
async fn test_missing_member_fails_before_registration() {
    let source = Arc::new(CountingSource {
        inner: MemorySource::new("memory"),
        registered: RwLock::new(0),
    });
    let parent = Parent {
        svc: None,
        ..Parent::new()
    };

    let result = register_group(source.clone(), &parent, BinderOptions::new()).await;

    assert!(matches!(result, Err(ConfigError::MustBeStructPointer)));
    assert_eq!(*source.registered.read().unwrap(), 0);
}

#[tokio::test]
async fn test_members_share_options() {
    let source = Arc::new(MemorySource::new("memory"));
    source.set("app.yml", "app.server.port", 1);
    source.mark_ready("app.yml");

    let parent = Parent::new();
    let group = register_group(
        source.clone(),
        &parent,
        BinderOptions::new()
            .with_extra_namespaces(["app.yml"])
            .with_wait_timeout(Duration::from_millis(50)),
    )
    .await
    .unwrap();

    // "application" never becomes ready for either member.
    assert_eq!(group.polls.len(), 4);
    let timeouts = group
        .polls
        .iter()
        .filter(|p| matches!(p.result, Err(ConfigError::WaitInitTimeout { .. })))
        .count();
    assert_eq!(timeouts, 2);
    assert_eq!(parent.app.read().unwrap().server.port, 1);
}
