//! Whole-argument-list patterns.

use super::types::{ArgumentMatcher, Equals};
use serde_json::Value;

/// One matcher per argument position.
///
/// A pattern matches an argument list only when the arity agrees and every
/// position is accepted by its matcher.
#[derive(Default)]
pub struct ArgsPattern {
    matchers: Vec<Box<dyn ArgumentMatcher>>,
}

impl ArgsPattern {
    /// A pattern matching calls without arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// A pattern matching exactly the given values.
    pub fn exact<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        values
            .into_iter()
            .fold(Self::new(), |pattern, value| pattern.arg(Equals::new(value)))
    }

    /// Append a matcher for the next argument position.
    pub fn arg(mut self, matcher: impl ArgumentMatcher + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn matches(&self, args: &[Value]) -> bool {
        self.matchers.len() == args.len()
            && self
                .matchers
                .iter()
                .zip(args)
                .all(|(matcher, actual)| matcher.matches(actual))
    }

    /// Comma-separated matcher descriptions, e.g. `"1", <any>`.
    pub fn describe(&self) -> String {
        self.matchers
            .iter()
            .map(|m| m.describe())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Debug for ArgsPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ArgsPattern").field(&self.describe()).finish()
    }
}

impl From<Vec<Value>> for ArgsPattern {
    fn from(values: Vec<Value>) -> Self {
        Self::exact(values)
    }
}

impl<const N: usize> From<[Value; N]> for ArgsPattern {
    fn from(values: [Value; N]) -> Self {
        Self::exact(values)
    }
}
