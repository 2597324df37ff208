//! Test doubles and the call-interception entry point.

use crate::error::{Result, StrictnessError};
use crate::invocation::{DoubleId, Invocation};
use crate::matcher::ArgsPattern;
use crate::session::{self, SessionState, SharedState};
use crate::strictness::Strictness;
use crate::stubbing::StubbingBuilder;
use serde_json::Value;
use std::cell::RefCell;
use std::panic::Location;
use std::rc::{Rc, Weak};

/// Settings for a double created with [`MockingSession::mock_with`].
///
/// [`MockingSession::mock_with`]: crate::MockingSession::mock_with
#[derive(Debug, Clone, PartialEq)]
pub struct MockSettings {
    pub(crate) name: String,
    pub(crate) strictness: Option<Strictness>,
    pub(crate) default_answer: Value,
}

impl MockSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strictness: None,
            default_answer: Value::Null,
        }
    }

    /// Strictness for every stubbing of this double that sets none itself.
    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = Some(strictness);
        self
    }

    pub fn lenient(self) -> Self {
        self.strictness(Strictness::Lenient)
    }

    /// Result of calls that match no stubbing (`null` by default).
    pub fn default_answer(mut self, value: impl Into<Value>) -> Self {
        self.default_answer = value.into();
        self
    }
}

/// Handle to one test double.
///
/// The double only holds a weak reference to its session; once the session is
/// dropped every operation on the double is a misuse error.
#[derive(Clone)]
pub struct Double {
    id: DoubleId,
    name: String,
    session: Weak<RefCell<SessionState>>,
}

impl Double {
    pub(crate) fn new(id: DoubleId, name: String, session: &SharedState) -> Self {
        Self {
            id,
            name,
            session: Rc::downgrade(session),
        }
    }

    pub fn id(&self) -> DoubleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start stubbing `method` for calls whose arguments match `pattern`.
    #[track_caller]
    pub fn stub(
        &self,
        method: impl Into<String>,
        pattern: impl Into<ArgsPattern>,
    ) -> StubbingBuilder {
        StubbingBuilder::new(
            self.clone(),
            method.into(),
            pattern.into(),
            Location::caller(),
        )
    }

    /// Intercept a call of `method` with `args`.
    ///
    /// This is the single entry point through which proxies route calls. It
    /// fails only when the call conflicts with a strict stubbing, when the
    /// matched stubbing answers with a failure, or on misuse.
    #[track_caller]
    pub fn call<I>(&self, method: &str, args: I) -> Result<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        let location = Location::caller();
        let state = self.session()?;
        let (answer, invocation) = session::write(&state)?.intercept(
            self.id,
            method,
            args.into_iter().collect(),
            location,
        )?;
        answer.apply(&invocation)
    }

    /// Every call made on this double so far, in call order.
    pub fn invocations(&self) -> Result<Vec<Invocation>> {
        let state = self.session()?;
        let invocations = session::read(&state)?
            .invocations_of(self.id)
            .cloned()
            .collect();
        Ok(invocations)
    }

    pub(crate) fn session(&self) -> Result<SharedState> {
        self.session.upgrade().ok_or_else(|| {
            StrictnessError::Misuse(format!(
                "mock '{}' outlived its mocking session",
                self.name
            ))
        })
    }

    pub(crate) fn belongs_to(&self, state: &SharedState) -> bool {
        std::ptr::eq(self.session.as_ptr(), Rc::as_ptr(state))
    }
}

impl std::fmt::Debug for Double {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Double")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
