//! Structured findings, independent of how they are rendered.

use crate::invocation::{DoubleId, Invocation};
use crate::stubbing::StubbingRecord;
use serde::Serialize;
use serde_json::Value;

/// Kind of strictness finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    UnnecessaryStubbing,
    UnverifiedInteraction,
    PotentialStubbingConflict,
}

/// Whether a finding points at a stubbing or at a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingOrigin {
    Stubbing,
    Invocation,
}

/// One entry of a strictness report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub origin: FindingOrigin,
    pub double: DoubleId,
    pub mock: String,
    pub method: String,
    /// Actual arguments, for findings about calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<Value>>,
    /// Registration sequence of a stubbing or call sequence of an invocation.
    pub position: u64,
    /// Rendered call or stubbing, e.g. `mock.simple_method("1")`.
    pub description: String,
    /// Source location as `file:line:column`.
    pub location: String,
}

impl Finding {
    pub(crate) fn from_stubbing(kind: FindingKind, record: &StubbingRecord) -> Self {
        Self {
            kind,
            origin: FindingOrigin::Stubbing,
            double: record.double(),
            mock: record.mock_name.clone(),
            method: record.method().to_string(),
            arguments: None,
            position: record.id().sequence(),
            description: record.describe(),
            location: record.location(),
        }
    }

    pub(crate) fn from_invocation(kind: FindingKind, invocation: &Invocation) -> Self {
        Self {
            kind,
            origin: FindingOrigin::Invocation,
            double: invocation.double(),
            mock: invocation.mock_name().to_string(),
            method: invocation.method().to_string(),
            arguments: Some(invocation.args().to_vec()),
            position: invocation.sequence(),
            description: invocation.describe(),
            location: invocation.location(),
        }
    }
}
