//! Invocation classifier: decides, for every intercepted call, whether it hit a
//! stubbing, conflicts with a strict stubbing, or is free.
//!
//! The classifier never raises by itself. A [`Outcome::Conflict`] is turned
//! into a potential-stubbing-problem error by the session at the call site.

use crate::invocation::{Classification, Invocation};
use crate::registry::MockRegistry;
use crate::strictness::{Strictness, effective_strictness};
use crate::stubbing::{Answer, StubId};
use tracing::debug;

/// Result of classifying one invocation.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// The most recent stubbing accepting the arguments was used.
    Matched {
        stub: StubId,
        strictness: Strictness,
        answer: Answer,
    },
    /// No stubbing accepted the arguments; these strict stubbings exist for
    /// the method, in registration order.
    Conflict { strict_stubs: Vec<StubId> },
    /// No stubbing accepted the arguments and none of the method's stubbings is strict.
    Free,
}

impl Outcome {
    pub(crate) fn classification(&self) -> Classification {
        match self {
            Outcome::Matched {
                stub, strictness, ..
            } => Classification::Matched {
                stub: *stub,
                strictness: *strictness,
            },
            Outcome::Conflict { .. } => Classification::UnmatchedConflict,
            Outcome::Free => Classification::UnmatchedFree,
        }
    }
}

/// Classify `invocation` against the stubbings of its double.
///
/// Only a matched stubbing has its usage counter incremented; conflicts and
/// free calls leave every record untouched.
pub(crate) fn classify(
    registry: &mut MockRegistry,
    session_default: Strictness,
    invocation: &Invocation,
) -> Outcome {
    if let Some(record) =
        registry.first_match_mut(invocation.double, &invocation.method, &invocation.args)
    {
        let strictness = effective_strictness(session_default, record);
        let answer = record.mark_used();
        debug!(
            call = %invocation.describe(),
            stub = record.id.0,
            %strictness,
            "invocation matched stubbing"
        );
        return Outcome::Matched {
            stub: record.id,
            strictness,
            answer,
        };
    }

    let mut strict_stubs: Vec<StubId> = registry
        .records_for(invocation.double, &invocation.method)
        .filter(|r| effective_strictness(session_default, r) == Strictness::Strict)
        .map(|r| r.id())
        .collect();

    if strict_stubs.is_empty() {
        debug!(call = %invocation.describe(), "invocation matched no stubbing");
        Outcome::Free
    } else {
        strict_stubs.reverse();
        Outcome::Conflict { strict_stubs }
    }
}
