//! Stubbing records and their answers.

use crate::error::{Result, StrictnessError};
use crate::invocation::{DoubleId, Invocation, format_location};
use crate::matcher::ArgsPattern;
use crate::strictness::Strictness;
use serde::Serialize;
use serde_json::Value;
use std::panic::Location;
use std::rc::Rc;

/// Registration sequence number of a stubbing, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StubId(pub(crate) u64);

impl StubId {
    /// Position in session-wide registration order, starting at 0.
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

pub(crate) type AnswerFn = Rc<dyn Fn(&Invocation) -> anyhow::Result<Value>>;

/// What a matched call produces.
#[derive(Clone)]
pub(crate) enum Answer {
    Return(Value),
    Fail(String),
    Do(AnswerFn),
}

impl Answer {
    pub(crate) fn apply(&self, invocation: &Invocation) -> Result<Value> {
        match self {
            Answer::Return(value) => Ok(value.clone()),
            Answer::Fail(message) => Err(StrictnessError::Answer(anyhow::anyhow!(
                "{} (stubbed failure for {})",
                message,
                invocation.describe()
            ))),
            Answer::Do(action) => action(invocation).map_err(StrictnessError::Answer),
        }
    }
}

impl std::fmt::Debug for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Answer::Return(value) => f.debug_tuple("Return").field(value).finish(),
            Answer::Fail(message) => f.debug_tuple("Fail").field(message).finish(),
            Answer::Do(_) => f.write_str("Do(..)"),
        }
    }
}

/// One registered behavior: pattern, answers, strictness override and usage.
#[derive(Debug)]
pub struct StubbingRecord {
    pub(crate) id: StubId,
    pub(crate) double: DoubleId,
    pub(crate) mock_name: String,
    pub(crate) method: String,
    pub(crate) pattern: ArgsPattern,
    pub(crate) answers: Vec<Answer>,
    pub(crate) strictness: Option<Strictness>,
    pub(crate) mock_strictness: Option<Strictness>,
    pub(crate) use_count: u64,
    pub(crate) location: &'static Location<'static>,
}

impl StubbingRecord {
    pub fn id(&self) -> StubId {
        self.id
    }

    pub fn double(&self) -> DoubleId {
        self.double
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn pattern(&self) -> &ArgsPattern {
        &self.pattern
    }

    /// Strictness set on this stubbing, if any.
    pub fn strictness_override(&self) -> Option<Strictness> {
        self.strictness
    }

    /// Strictness set on the owning double, if any.
    pub fn mock_strictness(&self) -> Option<Strictness> {
        self.mock_strictness
    }

    pub fn use_count(&self) -> u64 {
        self.use_count
    }

    pub fn location(&self) -> String {
        format_location(self.location)
    }

    /// Stubbing rendered as `mock.method("1")`.
    pub fn describe(&self) -> String {
        format!(
            "{}.{}({})",
            self.mock_name,
            self.method,
            self.pattern.describe()
        )
    }

    /// Count a matching call and pick its answer. The last answer repeats.
    pub(crate) fn mark_used(&mut self) -> Answer {
        self.use_count += 1;
        let index = (self.use_count as usize - 1).min(self.answers.len().saturating_sub(1));
        self.answers
            .get(index)
            .cloned()
            .unwrap_or(Answer::Return(Value::Null))
    }
}
