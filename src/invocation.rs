//! Intercepted calls and their classification outcome.

use crate::strictness::Strictness;
use crate::stubbing::StubId;
use serde::Serialize;
use serde_json::Value;
use std::panic::Location;

/// Identity of one test double within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DoubleId(pub(crate) u64);

impl std::fmt::Display for DoubleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One call on a double, as seen by the classifier.
///
/// An invocation is unclassified until the classifier assigns it a
/// [`Classification`]; only that outcome is kept in the session log.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub(crate) double: DoubleId,
    pub(crate) mock_name: String,
    pub(crate) method: String,
    pub(crate) args: Vec<Value>,
    pub(crate) sequence: u64,
    pub(crate) location: &'static Location<'static>,
}

impl Invocation {
    pub fn double(&self) -> DoubleId {
        self.double
    }

    pub fn mock_name(&self) -> &str {
        &self.mock_name
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Session-wide call order, starting at 1.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Source location of the call.
    pub fn location(&self) -> String {
        format_location(self.location)
    }

    /// Call rendered as `mock.method("arg", 2)`.
    pub fn describe(&self) -> String {
        let args = self
            .args
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}.{}({})", self.mock_name, self.method, args)
    }
}

/// Terminal classification of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum Classification {
    /// Matched a stubbing whose effective strictness is recorded.
    Matched { stub: StubId, strictness: Strictness },
    /// Matched nothing while a strict stubbing exists for the same method.
    UnmatchedConflict,
    /// Matched nothing and no strict stubbing exists for the method.
    UnmatchedFree,
}

/// Log entry kept by the session for every classified invocation.
#[derive(Debug, Clone)]
pub(crate) struct InvocationRecord {
    pub(crate) invocation: Invocation,
    pub(crate) classification: Classification,
    pub(crate) verified: bool,
}

impl InvocationRecord {
    pub(crate) fn new(invocation: Invocation, classification: Classification) -> Self {
        Self {
            invocation,
            classification,
            verified: false,
        }
    }

    /// A call that hit a strict stubbing is accounted for without explicit verification.
    pub(crate) fn is_implicitly_verified(&self) -> bool {
        matches!(
            self.classification,
            Classification::Matched {
                strictness: Strictness::Strict,
                ..
            }
        )
    }

    pub(crate) fn needs_verification(&self) -> bool {
        !self.verified && !self.is_implicitly_verified()
    }
}

pub(crate) fn format_location(location: &Location<'_>) -> String {
    format!(
        "{}:{}:{}",
        location.file(),
        location.line(),
        location.column()
    )
}
