//! Session-owned state: doubles, stubbings, the invocation log and the journal.

use crate::classifier::{Outcome, classify};
use crate::double::MockSettings;
use crate::error::{Result, StrictnessError};
use crate::events::{EventJournal, SessionAction, SessionEvent};
use crate::invocation::{DoubleId, Invocation, InvocationRecord};
use crate::registry::MockRegistry;
use crate::report::{Finding, FindingKind, Reporter};
use crate::strictness::{Strictness, effective_strictness};
use crate::stubbing::{Answer, StubId, StubbingDraft, StubbingRecord};
use serde_json::{Value, json};
use std::cell::{Ref, RefCell, RefMut};
use std::panic::Location;
use std::rc::Rc;
use tracing::{debug, warn};

pub(crate) type SharedState = Rc<RefCell<SessionState>>;

/// Shared access to the session state.
///
/// Matchers and reporters run while the session is mutably borrowed; touching
/// the session from there is a misuse error instead of a `RefCell` panic.
pub(crate) fn read(state: &SharedState) -> Result<Ref<'_, SessionState>> {
    state.try_borrow().map_err(|_| reentrant_access())
}

/// Exclusive access to the session state, see [`read`].
pub(crate) fn write(state: &SharedState) -> Result<RefMut<'_, SessionState>> {
    state.try_borrow_mut().map_err(|_| reentrant_access())
}

fn reentrant_access() -> StrictnessError {
    StrictnessError::Misuse(
        "re-entrant access to a mocking session while it is classifying a call \
         or rendering a report"
            .to_string(),
    )
}

/// Non-owning registration of a double.
#[derive(Debug, Clone)]
pub(crate) struct MockEntry {
    pub(crate) name: String,
    pub(crate) strictness: Option<Strictness>,
    pub(crate) default_answer: Value,
}

pub(crate) struct SessionState {
    pub(crate) name: String,
    pub(crate) strictness: Strictness,
    pub(crate) closed: bool,
    pub(crate) registry: MockRegistry,
    pub(crate) mocks: Vec<MockEntry>,
    pub(crate) invocations: Vec<InvocationRecord>,
    pub(crate) journal: EventJournal,
    pub(crate) reporter: Box<dyn Reporter>,
}

impl SessionState {
    pub(crate) fn new(
        name: String,
        strictness: Strictness,
        record_events: bool,
        reporter: Box<dyn Reporter>,
    ) -> Self {
        Self {
            name,
            strictness,
            closed: false,
            registry: MockRegistry::new(),
            mocks: Vec::new(),
            invocations: Vec::new(),
            journal: EventJournal::new(record_events),
            reporter,
        }
    }

    pub(crate) fn ensure_open(&self, action: &str) -> Result<()> {
        if self.closed {
            return Err(StrictnessError::Misuse(format!(
                "cannot {} after session '{}' finished mocking",
                action, self.name
            )));
        }
        Ok(())
    }

    pub(crate) fn event(&self, action: SessionAction) -> SessionEvent {
        SessionEvent::new(action, self.name.as_str())
    }

    pub(crate) fn record(&mut self, event: SessionEvent) {
        self.journal.append(event);
    }

    pub(crate) fn add_mock(&mut self, settings: MockSettings) -> Result<DoubleId> {
        self.ensure_open("create mocks")?;

        let id = DoubleId(self.mocks.len() as u64);
        debug!(session = %self.name, mock = %settings.name, "mock created");
        let event = self
            .event(SessionAction::MockCreated)
            .with_mock(settings.name.as_str())
            .with_details(json!({
                "id": id.0,
                "strictness": settings.strictness.map(|s| s.as_str()),
            }));
        self.record(event);

        self.mocks.push(MockEntry {
            name: settings.name,
            strictness: settings.strictness,
            default_answer: settings.default_answer,
        });
        Ok(id)
    }

    pub(crate) fn mock_entry(&self, id: DoubleId) -> Result<&MockEntry> {
        self.mocks.get(id.0 as usize).ok_or_else(|| {
            StrictnessError::Misuse(format!(
                "mock {} is not registered with session '{}'",
                id, self.name
            ))
        })
    }

    pub(crate) fn register_stubbing(
        &mut self,
        double: DoubleId,
        draft: StubbingDraft,
    ) -> Result<StubId> {
        self.ensure_open("register stubbings")?;
        let mock = self.mock_entry(double)?.clone();

        let record = StubbingRecord {
            id: StubId(0),
            double,
            mock_name: mock.name.clone(),
            method: draft.method,
            pattern: draft.pattern,
            answers: vec![draft.answer],
            strictness: draft.strictness,
            mock_strictness: mock.strictness,
            use_count: 0,
            location: draft.location,
        };
        let id = self.registry.register(record);

        let (description, location) = match self.registry.get(id) {
            Some(record) => (record.describe(), record.location()),
            None => (String::new(), String::new()),
        };
        debug!(stub = id.0, %description, %location, "stubbing registered");
        let event = self
            .event(SessionAction::Stubbed)
            .with_mock(mock.name.as_str())
            .with_details(json!({
                "stub": id.0,
                "stubbing": description,
                "strictness": draft.strictness.map(|s| s.as_str()),
                "location": location,
            }));
        self.record(event);

        Ok(id)
    }

    pub(crate) fn add_answer(&mut self, id: StubId, answer: Answer) -> Result<()> {
        self.ensure_open("add answers to stubbings")?;
        let record = self.registry.get_mut(id).ok_or_else(|| unknown_stubbing(id))?;
        record.answers.push(answer);
        Ok(())
    }

    pub(crate) fn stubbing(&self, id: StubId) -> Result<&StubbingRecord> {
        self.registry.get(id).ok_or_else(|| unknown_stubbing(id))
    }

    pub(crate) fn effective_strictness(&self, id: StubId) -> Result<Strictness> {
        Ok(effective_strictness(self.strictness, self.stubbing(id)?))
    }

    /// Classify a call and pick its answer.
    ///
    /// The answer is returned rather than applied so the caller can run it
    /// without holding the session borrow.
    pub(crate) fn intercept(
        &mut self,
        double: DoubleId,
        method: &str,
        args: Vec<Value>,
        location: &'static Location<'static>,
    ) -> Result<(Answer, Invocation)> {
        self.ensure_open("intercept calls")?;
        let mock = self.mock_entry(double)?;

        let invocation = Invocation {
            double,
            mock_name: mock.name.clone(),
            method: method.to_string(),
            args,
            sequence: self.invocations.len() as u64 + 1,
            location,
        };
        let default_answer = mock.default_answer.clone();

        let outcome = classify(&mut self.registry, self.strictness, &invocation);
        let classification = outcome.classification();
        self.invocations
            .push(InvocationRecord::new(invocation.clone(), classification));

        let event = self
            .event(SessionAction::Invoked)
            .with_mock(invocation.mock_name.as_str())
            .with_details(json!({
                "sequence": invocation.sequence,
                "call": invocation.describe(),
                "classification": serde_json::to_value(classification).unwrap_or_default(),
            }));
        self.record(event);

        match outcome {
            Outcome::Matched { answer, .. } => Ok((answer, invocation)),
            Outcome::Free => Ok((Answer::Return(default_answer), invocation)),
            Outcome::Conflict { strict_stubs } => {
                Err(self.potential_stubbing_problem(&invocation, &strict_stubs))
            }
        }
    }

    /// Every logged call on `double`, in call order.
    pub(crate) fn invocations_of(&self, double: DoubleId) -> impl Iterator<Item = &Invocation> {
        self.invocations
            .iter()
            .filter(move |r| r.invocation.double == double)
            .map(|r| &r.invocation)
    }

    fn potential_stubbing_problem(
        &mut self,
        invocation: &Invocation,
        strict_stubs: &[StubId],
    ) -> StrictnessError {
        let kind = FindingKind::PotentialStubbingConflict;
        let mut findings = vec![Finding::from_invocation(kind, invocation)];
        findings.extend(
            strict_stubs
                .iter()
                .filter_map(|id| self.registry.get(*id))
                .map(|record| Finding::from_stubbing(kind, record)),
        );

        warn!(
            call = %invocation.describe(),
            location = %invocation.location(),
            conflicting = strict_stubs.len(),
            "strict stubbing argument mismatch"
        );
        let event = self
            .event(SessionAction::StubbingProblem)
            .with_mock(invocation.mock_name.as_str())
            .with_details(json!({
                "call": invocation.describe(),
                "stubs": strict_stubs.iter().map(|id| id.0).collect::<Vec<_>>(),
            }));
        self.record(event);

        let message = self.reporter.render(kind, &findings);
        StrictnessError::PotentialStubbingProblem { message, findings }
    }
}

fn unknown_stubbing(id: StubId) -> StrictnessError {
    StrictnessError::Misuse(format!("stubbing #{} is not registered", id.0))
}
