//! Session event journal.
//!
//! Every lifecycle step of a mocking session is recorded as a structured event
//! so a failing test can be replayed from its journal. Events serialize to
//! NDJSON (one JSON object per line).
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: The lifecycle step (start, mock_created, stubbed, invoked, ...)
//! - `session`: The session name
//! - `mock`: Optional mock name for mock-specific events
//! - `details`: Freeform object with action-specific details
//!
//! ```
//! use serde_json::json;
//! use strictmock::{MockingSession, SessionAction, Strictness};
//!
//! let session = MockingSession::start(Strictness::Strict);
//! let mock = session.mock("mock")?;
//! mock.stub("simple_method", [json!("1")]).then_return("1")?;
//!
//! let actions: Vec<_> = session.events()?.iter().map(|e| e.action).collect();
//! assert_eq!(
//!     actions,
//!     vec![SessionAction::Start, SessionAction::MockCreated, SessionAction::Stubbed]
//! );
//! # Ok::<(), strictmock::StrictnessError>(())
//! ```

use crate::error::{Result, StrictnessError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle steps that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    /// Session started
    Start,
    /// Double registered with the session
    MockCreated,
    /// Stubbing registered
    Stubbed,
    /// Call intercepted and classified
    Invoked,
    /// Call failed with a potential stubbing problem
    StubbingProblem,
    /// Explicit verification or verify-no-more-interactions run
    Verified,
    /// Session finished (with or without audit)
    Finished,
}

impl std::fmt::Display for SessionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionAction::Start => write!(f, "start"),
            SessionAction::MockCreated => write!(f, "mock_created"),
            SessionAction::Stubbed => write!(f, "stubbed"),
            SessionAction::Invoked => write!(f, "invoked"),
            SessionAction::StubbingProblem => write!(f, "stubbing_problem"),
            SessionAction::Verified => write!(f, "verified"),
            SessionAction::Finished => write!(f, "finished"),
        }
    }
}

/// An event record for the session journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The lifecycle step.
    pub action: SessionAction,

    /// Name of the session that recorded the event.
    pub session: String,

    /// Optional mock name for mock-specific events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mock: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl SessionEvent {
    /// Create a new event timestamped now.
    pub fn new(action: SessionAction, session: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            action,
            session: session.into(),
            mock: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_mock(mut self, mock: impl Into<String>) -> Self {
        self.mock = Some(mock.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| StrictnessError::Journal(format!("session event: {}", e)))
    }
}

/// In-memory, append-only journal owned by a session.
#[derive(Debug, Default)]
pub(crate) struct EventJournal {
    enabled: bool,
    events: Vec<SessionEvent>,
}

impl EventJournal {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            events: Vec::new(),
        }
    }

    pub(crate) fn append(&mut self, event: SessionEvent) {
        if self.enabled {
            self.events.push(event);
        }
    }

    pub(crate) fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// All events as NDJSON, one line per event with a trailing newline.
    pub(crate) fn to_ndjson(&self) -> Result<String> {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&event.to_ndjson_line()?);
            out.push('\n');
        }
        Ok(out)
    }
}
