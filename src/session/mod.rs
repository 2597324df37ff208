//! Mocking sessions: default strictness, the doubles created under it, and the
//! end-of-session audit.
//!
//! A session is `OPEN` from [`SessionBuilder::start`] until the first call to
//! [`MockingSession::finish_mocking`] (or
//! [`MockingSession::finish_mocking_after_failure`]). Once closed, creating
//! mocks, registering stubbings and intercepting calls are misuse errors;
//! verification stays available.

mod audit;
mod state;
mod verification;

#[cfg(test)]
mod tests;

pub use verification::VerificationMode;

pub(crate) use state::{SessionState, SharedState, read, write};

use crate::config::SessionConfig;
use crate::double::{Double, MockSettings};
use crate::error::{Result, StrictnessError};
use crate::events::{SessionAction, SessionEvent};
use crate::matcher::ArgsPattern;
use crate::report::{DefaultReporter, Reporter};
use crate::strictness::Strictness;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

/// Builder for [`MockingSession`].
pub struct SessionBuilder {
    config: SessionConfig,
    reporter: Option<Box<dyn Reporter>>,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            reporter: None,
        }
    }

    /// Use every setting of `config`.
    pub fn config(mut self, config: &SessionConfig) -> Self {
        self.config = config.clone();
        self
    }

    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.config.strictness = strictness;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn show_locations(mut self, show: bool) -> Self {
        self.config.show_locations = show;
        self
    }

    pub fn record_events(mut self, record: bool) -> Self {
        self.config.record_events = record;
        self
    }

    /// Replace the default report wording.
    pub fn reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    pub fn start(self) -> MockingSession {
        let SessionConfig {
            strictness,
            name,
            show_locations,
            record_events,
        } = self.config;
        let reporter = self
            .reporter
            .unwrap_or_else(|| Box::new(DefaultReporter::new(show_locations)));

        info!(session = %name, %strictness, "mocking session started");
        let mut state = SessionState::new(name.clone(), strictness, record_events, reporter);
        let event = state
            .event(SessionAction::Start)
            .with_details(json!({ "strictness": strictness.as_str() }));
        state.record(event);

        MockingSession {
            name,
            strictness,
            state: Rc::new(RefCell::new(state)),
        }
    }
}

impl std::fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("config", &self.config)
            .field("custom_reporter", &self.reporter.is_some())
            .finish()
    }
}

/// Owner of all doubles, stubbings and invocation logs of one test.
///
/// Methods that read or change session state return a misuse error when they
/// are called from inside an argument matcher or a [`Reporter`], since the
/// session is busy classifying a call at that point.
pub struct MockingSession {
    name: String,
    strictness: Strictness,
    state: SharedState,
}

impl MockingSession {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Start a session with the given default strictness.
    pub fn start(strictness: Strictness) -> Self {
        Self::builder().strictness(strictness).start()
    }

    /// Start a session from a validated configuration.
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::builder().config(config).start())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default strictness of the session.
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    pub fn is_closed(&self) -> Result<bool> {
        Ok(read(&self.state)?.closed)
    }

    /// Create a double named `name` with default settings.
    pub fn mock(&self, name: impl Into<String>) -> Result<Double> {
        self.mock_with(MockSettings::new(name))
    }

    pub fn mock_with(&self, settings: MockSettings) -> Result<Double> {
        let name = settings.name.clone();
        let id = write(&self.state)?.add_mock(settings)?;
        Ok(Double::new(id, name, &self.state))
    }

    /// Verify how often `method` was called on `double` with matching arguments.
    ///
    /// Verified calls are no longer reported by
    /// [`verify_no_more_interactions`](Self::verify_no_more_interactions).
    pub fn verify(
        &self,
        double: &Double,
        method: &str,
        pattern: impl Into<ArgsPattern>,
        mode: VerificationMode,
    ) -> Result<()> {
        self.check_owned(double)?;
        write(&self.state)?.verify(double.id(), method, &pattern.into(), mode)
    }

    /// Fail if any of `doubles` has a call that is neither explicitly verified
    /// nor matched against a strict stubbing.
    pub fn verify_no_more_interactions(&self, doubles: &[&Double]) -> Result<()> {
        for double in doubles {
            self.check_owned(double)?;
        }
        let ids: Vec<_> = doubles.iter().map(|d| d.id()).collect();
        write(&self.state)?.verify_no_more_interactions(&ids)
    }

    /// Close the session and report unused strict stubbings.
    ///
    /// Calling it again is a misuse error and reports nothing new.
    pub fn finish_mocking(&self) -> Result<()> {
        write(&self.state)?.finish(true)
    }

    /// Close the session without the unnecessary-stubbing audit, for tests
    /// that already failed.
    pub fn finish_mocking_after_failure(&self) -> Result<()> {
        write(&self.state)?.finish(false)
    }

    /// Journal of the session so far.
    pub fn events(&self) -> Result<Vec<SessionEvent>> {
        Ok(read(&self.state)?.journal.events().to_vec())
    }

    /// Journal of the session as NDJSON.
    pub fn events_ndjson(&self) -> Result<String> {
        read(&self.state)?.journal.to_ndjson()
    }

    fn check_owned(&self, double: &Double) -> Result<()> {
        if double.belongs_to(&self.state) {
            return Ok(());
        }
        Err(StrictnessError::Misuse(format!(
            "mock '{}' belongs to a different mocking session than '{}'",
            double.name(),
            self.name
        )))
    }
}

impl std::fmt::Debug for MockingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("MockingSession");
        out.field("name", &self.name)
            .field("strictness", &self.strictness);
        match self.state.try_borrow() {
            Ok(state) => out
                .field("closed", &state.closed)
                .field("mocks", &state.mocks.len())
                .field("stubbings", &state.registry.len())
                .finish(),
            Err(_) => out.finish_non_exhaustive(),
        }
    }
}
