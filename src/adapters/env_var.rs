// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment placeholder substitution.
//!
//! String values may reference process environment variables as `${NAME}`, where
//! `NAME` matches `[\w-]+`. Unset variables substitute to the empty string.
//! Binders only apply this to textual values, and only when enabled.

use fancy_regex::Regex;
use once_cell::sync::Lazy;
use std::env;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{[\w\-]+\}").unwrap_or_else(|e| panic!("invalid placeholder pattern: {}", e))
});

/// Replaces every `${NAME}` placeholder with the value of the environment variable.
///
/// # Examples
///
/// ```rust
/// use hexbind::adapters::env_var::substitute_env_vars;
///
/// std::env::set_var("HEXBIND_DOC_ROOT", "/srv");
/// assert_eq!(substitute_env_vars("${HEXBIND_DOC_ROOT}/data"), "/srv/data");
/// assert_eq!(substitute_env_vars("${HEXBIND_DOC_UNSET}/data"), "/data");
/// ```
pub fn substitute_env_vars(input: &str) -> String {
    substitute_with(input, |name| env::var(name).ok())
}

/// Replaces every `${NAME}` placeholder using `lookup`; names it cannot resolve
/// become empty.
///
/// # Examples
///
/// ```rust
/// use hexbind::adapters::env_var::substitute_with;
///
/// let resolved = substitute_with("${A}-${B}-${A}", |name| (name == "A").then(|| "x".to_string()));
/// assert_eq!(resolved, "x--x");
/// ```
pub fn substitute_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut output = String::with_capacity(input.len());
    let mut last = 0;
    for found in PLACEHOLDER.find_iter(input).flatten() {
        let placeholder = found.as_str();
        let name = &placeholder[2..placeholder.len() - 1];
        output.push_str(&input[last..found.start()]);
        output.push_str(&lookup(name).unwrap_or_default());
        last = found.end();
    }
    output.push_str(&input[last..]);
    output
}
