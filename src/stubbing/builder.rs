//! Fluent stubbing registration.

use super::record::{Answer, StubId};
use crate::double::Double;
use crate::error::{Result, StrictnessError};
use crate::invocation::Invocation;
use crate::matcher::ArgsPattern;
use crate::session::{self, SessionState, SharedState};
use crate::strictness::Strictness;
use serde_json::Value;
use std::cell::RefCell;
use std::panic::Location;
use std::rc::{Rc, Weak};

/// Everything the session needs to register a stubbing.
pub(crate) struct StubbingDraft {
    pub(crate) method: String,
    pub(crate) pattern: ArgsPattern,
    pub(crate) answer: Answer,
    pub(crate) strictness: Option<Strictness>,
    pub(crate) location: &'static Location<'static>,
}

/// A stubbing in progress, created by [`Double::stub`].
#[must_use = "a stubbing is only registered once an answer is supplied"]
#[derive(Debug)]
pub struct StubbingBuilder {
    double: Double,
    method: String,
    pattern: ArgsPattern,
    strictness: Option<Strictness>,
    location: &'static Location<'static>,
}

impl StubbingBuilder {
    pub(crate) fn new(
        double: Double,
        method: String,
        pattern: ArgsPattern,
        location: &'static Location<'static>,
    ) -> Self {
        Self {
            double,
            method,
            pattern,
            strictness: None,
            location,
        }
    }

    /// Override the strictness for this stubbing only.
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = Some(strictness);
        self
    }

    /// Shorthand for `with_strictness(Strictness::Lenient)`.
    pub fn lenient(self) -> Self {
        self.with_strictness(Strictness::Lenient)
    }

    /// Register the stubbing, answering matched calls with `value`.
    pub fn then_return(self, value: impl Into<Value>) -> Result<StubbingHandle> {
        self.register(Answer::Return(value.into()))
    }

    /// Register the stubbing, failing matched calls with `message`.
    pub fn then_fail(self, message: impl Into<String>) -> Result<StubbingHandle> {
        self.register(Answer::Fail(message.into()))
    }

    /// Register the stubbing, answering matched calls with `action`.
    pub fn then_do<F>(self, action: F) -> Result<StubbingHandle>
    where
        F: Fn(&Invocation) -> anyhow::Result<Value> + 'static,
    {
        self.register(Answer::Do(Rc::new(action)))
    }

    fn register(self, answer: Answer) -> Result<StubbingHandle> {
        let state = self.double.session()?;
        let draft = StubbingDraft {
            method: self.method,
            pattern: self.pattern,
            answer,
            strictness: self.strictness,
            location: self.location,
        };
        let id = session::write(&state)?.register_stubbing(self.double.id(), draft)?;
        Ok(StubbingHandle {
            id,
            session: Rc::downgrade(&state),
        })
    }
}

/// A registered stubbing. Further answers are consumed after the earlier ones.
#[derive(Clone)]
pub struct StubbingHandle {
    id: StubId,
    session: Weak<RefCell<SessionState>>,
}

impl StubbingHandle {
    pub fn id(&self) -> StubId {
        self.id
    }

    /// Append an answer returning `value`.
    pub fn then_return(self, value: impl Into<Value>) -> Result<Self> {
        self.push(Answer::Return(value.into()))
    }

    /// Append an answer failing with `message`.
    pub fn then_fail(self, message: impl Into<String>) -> Result<Self> {
        self.push(Answer::Fail(message.into()))
    }

    /// Append an answer computed by `action`.
    pub fn then_do<F>(self, action: F) -> Result<Self>
    where
        F: Fn(&Invocation) -> anyhow::Result<Value> + 'static,
    {
        self.push(Answer::Do(Rc::new(action)))
    }

    /// Number of calls that matched this stubbing so far.
    pub fn use_count(&self) -> Result<u64> {
        let state = self.state()?;
        let count = session::read(&state)?.stubbing(self.id)?.use_count();
        Ok(count)
    }

    /// Strictness this stubbing resolves to under its session.
    pub fn effective_strictness(&self) -> Result<Strictness> {
        let state = self.state()?;
        let strictness = session::read(&state)?.effective_strictness(self.id)?;
        Ok(strictness)
    }

    fn push(self, answer: Answer) -> Result<Self> {
        let state = self.state()?;
        session::write(&state)?.add_answer(self.id, answer)?;
        Ok(self)
    }

    fn state(&self) -> Result<SharedState> {
        self.session.upgrade().ok_or_else(|| {
            StrictnessError::Misuse(format!(
                "stubbing #{} outlived its mocking session",
                self.id.0
            ))
        })
    }
}

impl std::fmt::Debug for StubbingHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubbingHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
