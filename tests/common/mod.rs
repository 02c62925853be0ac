// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use hexbind::domain::{ConfigValue, ValueRecord};
use hexbind::ports::Logger;
use hexbind::schema::{Configuration, Fields, Record};
use std::fmt;
use std::sync::{Mutex, Once};

static TRACING: Once = Once::new();

/// Routes library logs to the test output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Servlet {
    pub context_path: String,
}

impl Record for Servlet {
    fn describe(fields: &mut Fields<Self>) {
        fields.field("context_path", Some("contextPath"), |s| &mut s.context_path);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Server {
    pub port: i32,
    pub servlet: Servlet,
}

impl Record for Server {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("port", Some("port"), |s| &mut s.port)
            .record("servlet", None, |s| &mut s.servlet);
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Req {
    pub method: String,
    pub uri: String,
    pub timeout: i32,
}

impl Req {
    pub fn new(method: &str, uri: &str, timeout: i32) -> Self {
        Self {
            method: method.to_string(),
            uri: uri.to_string(),
            timeout,
        }
    }
}

impl Record for Req {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("method", None, |r| &mut r.method)
            .field("uri", None, |r| &mut r.uri)
            .field("timeout", Some("time-out"), |r| &mut r.timeout);
    }
}

/// The configuration most tests bind, below the `app` prefix.
#[derive(Debug, Default, PartialEq)]
pub struct TestConfig {
    pub server: Server,
    pub simple_slice: Vec<i32>,
    pub slice: Vec<Req>,
    pub slice_pointer: Vec<Box<Req>>,
}

impl Record for TestConfig {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .record("server", None, |c| &mut c.server)
            .field("simple_slice", None, |c| &mut c.simple_slice)
            .records("slice", None, |c| &mut c.slice)
            .boxed_records("slice_pointer", None, |c| &mut c.slice_pointer);
    }
}

impl Configuration for TestConfig {
    fn prefix(&self) -> &str {
        "app"
    }
}

/// A configuration exercising defaults, optional fields and substitution.
#[derive(Debug, Default, PartialEq)]
pub struct Defaults {
    pub name: String,
    pub home: String,
    pub retries: u8,
    pub ratio: f64,
    pub verbose: bool,
    pub limit: Option<i64>,
    pub tags: Vec<String>,
    pub backup: Option<Server>,
}

impl Record for Defaults {
    fn describe(fields: &mut Fields<Self>) {
        fields
            .field("name", Some("name,default:'demo'"), |d| &mut d.name)
            .field("home", Some("home,default:'${HEXBIND_TEST_HOME}/data'"), |d| &mut d.home)
            .field("retries", Some("retries,default:3"), |d| &mut d.retries)
            .field("ratio", Some(",default:'0.75'"), |d| &mut d.ratio)
            .field("verbose", Some("verbose,default:'T'"), |d| &mut d.verbose)
            .optional("limit", Some("limit,default:'100'"), |d| &mut d.limit)
            .field("tags", Some("tags,default:'a,b'"), |d| &mut d.tags)
            .optional_record("backup", None, |d| &mut d.backup);
    }
}

impl Configuration for Defaults {
    fn prefix(&self) -> &str {
        "svc"
    }
}

/// Logger capturing every message, for assertions on skipped keys.
#[derive(Default)]
pub struct RecordingLogger {
    pub errors: Mutex<Vec<String>>,
    pub warnings: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }
}

impl Logger for RecordingLogger {
    fn error(&self, args: fmt::Arguments<'_>) {
        self.errors.lock().unwrap().push(args.to_string());
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.warnings.lock().unwrap().push(args.to_string());
    }
}

/// Builds a key-value record element.
pub fn record(entries: &[(&str, ConfigValue)]) -> ConfigValue {
    ConfigValue::Record(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<ValueRecord>(),
    )
}
