//! Error types for strictmock.
//!
//! Uses thiserror for derive macros. Strictness findings carry both the rendered
//! report and the structured findings it was rendered from.

use crate::report::Finding;
use thiserror::Error;

/// Main error type for strictmock operations.
#[derive(Error, Debug)]
pub enum StrictnessError {
    /// A call on a double matched no stubbing while a strict stubbing exists
    /// for the same method with different arguments.
    #[error("{message}")]
    PotentialStubbingProblem {
        message: String,
        findings: Vec<Finding>,
    },

    /// Strict stubbings that were never used, reported when the session finishes.
    #[error("{message}")]
    UnnecessaryStubbing {
        message: String,
        findings: Vec<Finding>,
    },

    /// Interactions left unverified when no more interactions were wanted.
    #[error("{message}")]
    NoInteractionsWanted {
        message: String,
        findings: Vec<Finding>,
    },

    /// An explicit verification did not see the wanted number of calls.
    #[error("{0}")]
    Verification(String),

    /// The library was used incorrectly (closed session, foreign double, ...).
    #[error("Misuse: {0}")]
    Misuse(String),

    /// A stubbed answer failed while producing the call result.
    #[error(transparent)]
    Answer(anyhow::Error),

    /// Session configuration could not be read or is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The session journal could not be exported.
    #[error("Journal export failed: {0}")]
    Journal(String),
}

impl StrictnessError {
    /// Structured findings behind a strictness failure (empty for other errors).
    pub fn findings(&self) -> &[Finding] {
        match self {
            StrictnessError::PotentialStubbingProblem { findings, .. }
            | StrictnessError::UnnecessaryStubbing { findings, .. }
            | StrictnessError::NoInteractionsWanted { findings, .. } => findings,
            _ => &[],
        }
    }

    /// Whether this error is a caller mistake rather than a test finding.
    pub fn is_misuse(&self) -> bool {
        matches!(self, StrictnessError::Misuse(_) | StrictnessError::Config(_))
    }
}

/// Result type alias for strictmock operations.
pub type Result<T> = std::result::Result<T, StrictnessError>;
