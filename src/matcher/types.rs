//! Built-in argument matchers.

use regex::Regex;
use serde_json::Value;

/// Decides whether a single actual argument is accepted.
pub trait ArgumentMatcher {
    fn matches(&self, actual: &Value) -> bool;

    /// Human-readable form used when rendering stubbings in reports.
    fn describe(&self) -> String;
}

/// Equality with a fixed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Equals {
    expected: Value,
}

impl Equals {
    pub fn new(expected: Value) -> Self {
        Self { expected }
    }
}

impl ArgumentMatcher for Equals {
    fn matches(&self, actual: &Value) -> bool {
        *actual == self.expected
    }

    fn describe(&self) -> String {
        self.expected.to_string()
    }
}

/// Wildcard accepting every argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyArg;

impl ArgumentMatcher for AnyArg {
    fn matches(&self, _actual: &Value) -> bool {
        true
    }

    fn describe(&self) -> String {
        "<any>".to_string()
    }
}

/// Regex over string arguments. Non-string arguments never match.
#[derive(Debug, Clone)]
pub struct RegexMatch {
    regex: Regex,
}

impl RegexMatch {
    pub fn new(regex: Regex) -> Self {
        Self { regex }
    }
}

impl ArgumentMatcher for RegexMatch {
    fn matches(&self, actual: &Value) -> bool {
        actual.as_str().is_some_and(|s| self.regex.is_match(s))
    }

    fn describe(&self) -> String {
        format!("<matches /{}/>", self.regex.as_str())
    }
}

/// Arbitrary predicate with a description.
pub struct ArgThat {
    description: String,
    predicate: Box<dyn Fn(&Value) -> bool>,
}

impl ArgThat {
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        Self {
            description: description.into(),
            predicate: Box::new(predicate),
        }
    }
}

impl std::fmt::Debug for ArgThat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgThat")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl ArgumentMatcher for ArgThat {
    fn matches(&self, actual: &Value) -> bool {
        (self.predicate)(actual)
    }

    fn describe(&self) -> String {
        format!("<{}>", self.description)
    }
}
