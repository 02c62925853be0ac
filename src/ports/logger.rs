// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging capability trait definition.
//!
//! Binders report recovered runtime failures (conversion errors, polling errors,
//! panics) through an injected [`Logger`]. When none is supplied the
//! [`TracingLogger`] forwards everything to `tracing`.

use std::fmt;
use std::sync::Arc;

/// The two-method logging capability used by binders.
///
/// # Examples
///
/// ```rust
/// use hexbind::ports::Logger;
/// use std::fmt;
///
/// struct StderrLogger;
///
/// impl Logger for StderrLogger {
///     fn error(&self, args: fmt::Arguments<'_>) {
///         eprintln!("[ERROR] {}", args);
///     }
///
///     fn warn(&self, args: fmt::Arguments<'_>) {
///         eprintln!("[WARN] {}", args);
///     }
/// }
///
/// StderrLogger.error(format_args!("key {} skipped", "app.port"));
/// ```
pub trait Logger: Send + Sync {
    /// Reports a failure that was recovered from.
    fn error(&self, args: fmt::Arguments<'_>);

    /// Reports a suspicious but harmless condition.
    fn warn(&self, args: fmt::Arguments<'_>);
}

/// Logger that forwards to the `tracing` macros.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!("{}", args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!("{}", args);
    }
}

/// Logger that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn error(&self, _args: fmt::Arguments<'_>) {}

    fn warn(&self, _args: fmt::Arguments<'_>) {}
}

/// Returns the logger used when none is injected.
pub fn default_logger() -> Arc<dyn Logger> {
    Arc::new(TracingLogger)
}
