// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the binding crate.
//!
//! This example demonstrates:
//! - Describing a configuration structure with `Record` and `Configuration`
//! - Declaring tag keys and default values
//! - Binding it to an in-memory remote source and polling the initial snapshot
//! - Following added, updated and deleted keys as they arrive
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage
//! ```

use hexbind::prelude::*;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Servlet {
    context_path: String,
}

impl Record for Servlet {
    fn describe(fields: &mut Fields<Self>) {
        fields.field("context_path", None, |s| &mut s.context_path);
    }
}

#[derive(Debug, Default)]
struct Route {
    method: String,
    uri: String,
    timeout: u32,
}

impl Record for Route {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("method", None, |r| &mut r.method)
            .field("uri", None, |r| &mut r.uri)
            .field("timeout", Some("time-out"), |r| &mut r.timeout);
    }
}

#[derive(Debug, Default)]
struct App {
    port: u16,
    debug: bool,
    servlet: Servlet,
    routes: Vec<Box<Route>>,
}

impl Record for App {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("port", Some("port,default:'8080'"), |a| &mut a.port)
            .field("debug", Some("debug,default:'false'"), |a| &mut a.debug)
            .record("servlet", None, |a| &mut a.servlet)
            .boxed_records("routes", None, |a| &mut a.routes);
    }
}

impl Configuration for App {
    fn prefix(&self) -> &str {
        "app"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== Binding Crate: Basic Usage ===\n");

    // A remote source with one ready namespace
    let source = Arc::new(MemorySource::new("memory"));
    source.set("application", "app.servlet.contextPath", "/api");
    source.set("application", "app.debug", true);
    source.mark_ready("application");

    // Example 1: Register and poll the initial snapshot
    println!("--- Example 1: Initial Snapshot ---");
    let app = Arc::new(RwLock::new(App::default()));
    let (binder, polls) =
        ConfigBinder::register(source.clone(), Arc::clone(&app), BinderOptions::new()).await?;

    for poll in &polls {
        match &poll.result {
            Ok(()) => println!("✓ namespace {} applied", poll.namespace),
            Err(e) => println!("✗ namespace {} failed: {}", poll.namespace, e),
        }
    }
    println!("Bound configuration: {:?}", binder.read());

    // Example 2: Defaults declared in tags
    println!("\n--- Example 2: Defaults ---");
    println!("port (default 8080): {}", binder.read().port);

    // Example 3: Live updates, including lowercase keys
    println!("\n--- Example 3: Live Updates ---");
    source.set("application", "app.port", 9090);
    source.set("application", "app.servlet.contextpath", "/v2");
    let route: ConfigValue = [
        ("method", ConfigValue::from("GET")),
        ("uri", ConfigValue::from("/foo")),
        ("time-out", ConfigValue::from(10)),
    ]
    .into_iter()
    .collect();
    source.set("application", "app.routes", vec![route]);
    println!("After updates: {:?}", binder.read());

    // Example 4: Deleted keys reset to the zero value
    println!("\n--- Example 4: Deletion ---");
    source.delete("application", "app.port");
    println!("port after deletion: {}", app.read().unwrap_or_else(|e| e.into_inner()).port);

    // Example 5: Key introspection
    println!("\n--- Example 5: Checking Keys ---");
    for key in ["app.servlet.contextPath", "app.servlet.contextpath", "app.servlet"] {
        if binder.contains(key) {
            println!("✓ Key '{}' is bound", key);
        } else {
            println!("✗ Key '{}' is not bound", key);
        }
    }

    println!("\n=== Example Complete ===");

    Ok(())
}
