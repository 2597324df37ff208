//! End-of-session unnecessary-stubbing audit.

use super::state::SessionState;
use crate::error::{Result, StrictnessError};
use crate::events::SessionAction;
use crate::registry::MockRegistry;
use crate::report::{Finding, FindingKind};
use crate::strictness::{Strictness, effective_strictness};
use serde_json::json;
use tracing::{info, warn};

/// Strict stubbings that were never used, in session-wide registration order.
///
/// Lenient stubbings are never reported, whatever their usage.
pub(crate) fn unnecessary_stubbings(
    registry: &MockRegistry,
    session_default: Strictness,
) -> Vec<Finding> {
    registry
        .iter()
        .filter(|r| r.use_count() == 0)
        .filter(|r| effective_strictness(session_default, r) == Strictness::Strict)
        .map(|r| Finding::from_stubbing(FindingKind::UnnecessaryStubbing, r))
        .collect()
}

impl SessionState {
    /// Close the session, auditing unused strict stubbings when `audit` is set.
    ///
    /// Closing happens before the audit result is returned, so a failing audit
    /// is reported once and a second finish is a misuse.
    pub(crate) fn finish(&mut self, audit: bool) -> Result<()> {
        self.ensure_open("finish mocking")?;
        self.closed = true;

        let findings = if audit {
            unnecessary_stubbings(&self.registry, self.strictness)
        } else {
            Vec::new()
        };

        let event = self.event(SessionAction::Finished).with_details(json!({
            "audited": audit,
            "unnecessary_stubbings": findings.len(),
            "invocations": self.invocations.len(),
        }));
        self.record(event);

        if findings.is_empty() {
            info!(session = %self.name, audited = audit, "mocking session finished");
            return Ok(());
        }

        warn!(
            session = %self.name,
            count = findings.len(),
            "unnecessary stubbings detected"
        );
        let message = self
            .reporter
            .render(FindingKind::UnnecessaryStubbing, &findings);
        Err(StrictnessError::UnnecessaryStubbing { message, findings })
    }
}
