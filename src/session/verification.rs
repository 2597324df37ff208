//! Explicit verification and verify-no-more-interactions.

use super::state::SessionState;
use crate::error::{Result, StrictnessError};
use crate::events::SessionAction;
use crate::invocation::DoubleId;
use crate::matcher::ArgsPattern;
use crate::report::{Finding, FindingKind};
use serde_json::json;
use tracing::debug;

/// How many matching calls an explicit verification wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationMode {
    Times(u64),
    AtLeastOnce,
    Never,
}

impl VerificationMode {
    pub fn accepts(&self, actual: u64) -> bool {
        match self {
            VerificationMode::Times(wanted) => actual == *wanted,
            VerificationMode::AtLeastOnce => actual >= 1,
            VerificationMode::Never => actual == 0,
        }
    }

    fn failure(&self, wanted: &str, actual: u64) -> String {
        match self {
            VerificationMode::Never => format!(
                "Never wanted here:\n    {}\nBut invoked {} time(s).",
                wanted, actual
            ),
            VerificationMode::Times(n) if actual > 0 => format!(
                "{}\nWanted {} time(s) but was {}.",
                wanted, n, actual
            ),
            VerificationMode::Times(_) | VerificationMode::AtLeastOnce => {
                format!("Wanted but not invoked:\n    {}", wanted)
            }
        }
    }
}

impl SessionState {
    /// Check the number of calls of `method` on `double` matching `pattern`,
    /// flagging them verified on success.
    pub(crate) fn verify(
        &mut self,
        double: DoubleId,
        method: &str,
        pattern: &ArgsPattern,
        mode: VerificationMode,
    ) -> Result<()> {
        let mock_name = self.mock_entry(double)?.name.clone();
        let wanted = format!("{}.{}({})", mock_name, method, pattern.describe());

        let matching: Vec<usize> = self
            .invocations
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                r.invocation.double == double
                    && r.invocation.method == method
                    && pattern.matches(&r.invocation.args)
            })
            .map(|(i, _)| i)
            .collect();
        let actual = matching.len() as u64;
        let passed = mode.accepts(actual);

        debug!(%wanted, actual, passed, "verification");
        let event = self
            .event(SessionAction::Verified)
            .with_mock(mock_name.as_str())
            .with_details(json!({
                "wanted": wanted,
                "mode": format!("{:?}", mode),
                "actual": actual,
                "passed": passed,
            }));
        self.record(event);

        if !passed {
            return Err(StrictnessError::Verification(mode.failure(&wanted, actual)));
        }
        for i in matching {
            self.invocations[i].verified = true;
        }
        Ok(())
    }

    /// Fail on the first double, in argument order, with an unverified call.
    ///
    /// Calls that matched a strict stubbing count as verified.
    pub(crate) fn verify_no_more_interactions(&mut self, doubles: &[DoubleId]) -> Result<()> {
        if doubles.is_empty() {
            return Err(StrictnessError::Misuse(
                "verify_no_more_interactions requires at least one mock".to_string(),
            ));
        }

        for &double in doubles {
            let mock_name = self.mock_entry(double)?.name.clone();
            let findings: Vec<Finding> = self
                .invocations
                .iter()
                .filter(|r| r.invocation.double == double && r.needs_verification())
                .map(|r| Finding::from_invocation(FindingKind::UnverifiedInteraction, &r.invocation))
                .collect();

            let event = self
                .event(SessionAction::Verified)
                .with_mock(mock_name.as_str())
                .with_details(json!({
                    "mode": "no_more_interactions",
                    "unverified": findings.len(),
                }));
            self.record(event);

            if !findings.is_empty() {
                debug!(mock = %mock_name, unverified = findings.len(), "unverified interactions");
                let message = self
                    .reporter
                    .render(FindingKind::UnverifiedInteraction, &findings);
                return Err(StrictnessError::NoInteractionsWanted { message, findings });
            }
        }
        Ok(())
    }
}
