//! Strictness policy and its resolution for a single stubbing.

use crate::stubbing::StubbingRecord;
use serde::{Deserialize, Serialize};

/// Policy deciding whether argument mismatches and unused stubbings fail a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Argument drift and unused stubbings are tolerated.
    Lenient,
    /// Argument mismatches fail at the call site, unused stubbings fail the session.
    #[default]
    Strict,
}

impl Strictness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strictness::Lenient => "lenient",
            Strictness::Strict => "strict",
        }
    }

    /// Parse a strictness from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

impl std::fmt::Display for Strictness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve strictness from the most specific level that sets one.
///
/// A stubbing override wins over a mock-level setting, which wins over the
/// session default.
pub fn resolve(
    session_default: Strictness,
    mock_level: Option<Strictness>,
    stubbing_override: Option<Strictness>,
) -> Strictness {
    stubbing_override.or(mock_level).unwrap_or(session_default)
}

/// Effective strictness of a stubbing record under the given session default.
pub fn effective_strictness(session_default: Strictness, record: &StubbingRecord) -> Strictness {
    resolve(
        session_default,
        record.mock_strictness(),
        record.strictness_override(),
    )
}
