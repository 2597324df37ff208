//! Argument matching for stubbings and verifications.
//!
//! The engine only depends on the [`ArgumentMatcher`] capability. Built-in
//! variants cover equality, wildcards, regexes over string arguments and
//! arbitrary predicates. An [`ArgsPattern`] combines one matcher per argument.

mod pattern;
mod types;


// Re-export public API
pub use pattern::ArgsPattern;
pub use types::{AnyArg, ArgThat, ArgumentMatcher, Equals, RegexMatch};

use crate::error::{Result, StrictnessError};
use regex::Regex;
use serde_json::Value;

/// Match an argument equal to `value`.
pub fn eq(value: impl Into<Value>) -> Equals {
    Equals::new(value.into())
}

/// Match any argument.
pub fn any() -> AnyArg {
    AnyArg
}

/// Match string arguments against a regular expression.
///
/// An invalid pattern is a misuse of the matcher API.
pub fn matches_regex(pattern: &str) -> Result<RegexMatch> {
    let regex = Regex::new(pattern).map_err(|e| {
        StrictnessError::Misuse(format!("invalid argument regex '{}': {}", pattern, e))
    })?;
    Ok(RegexMatch::new(regex))
}

/// Match arguments accepted by `predicate`, described as `description` in reports.
pub fn arg_that<F>(description: impl Into<String>, predicate: F) -> ArgThat
where
    F: Fn(&Value) -> bool + 'static,
{
    ArgThat::new(description, predicate)
}
