//! Default wording of strictness reports.

use super::Reporter;
use super::finding::{Finding, FindingKind, FindingOrigin};

/// Reporter producing the stock messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultReporter {
    show_locations: bool,
}

impl DefaultReporter {
    pub fn new(show_locations: bool) -> Self {
        Self { show_locations }
    }

    fn at(&self, finding: &Finding) -> String {
        if self.show_locations {
            format!(" at {}", finding.location)
        } else {
            String::new()
        }
    }

    fn location_line(&self, finding: &Finding, indent: &str) -> String {
        if self.show_locations {
            format!("{}-> at {}\n", indent, finding.location)
        } else {
            String::new()
        }
    }

    /// Output format:
    /// ```text
    /// Unnecessary stubbings detected.
    /// Clean & maintainable test code requires zero unnecessary code.
    /// Following stubbings are unnecessary:
    ///   1. -> mock.simple_method("1") at src/lib.rs:10:5
    /// Please remove unnecessary stubbings or make them lenient.
    /// ```
    fn unnecessary_stubbing(&self, findings: &[Finding]) -> String {
        let mut msg = String::from(
            "Unnecessary stubbings detected.\n\
             Clean & maintainable test code requires zero unnecessary code.\n\
             Following stubbings are unnecessary:\n",
        );
        for (i, finding) in findings.iter().enumerate() {
            msg.push_str(&format!(
                "  {}. -> {}{}\n",
                i + 1,
                finding.description,
                self.at(finding)
            ));
        }
        msg.push_str("Please remove unnecessary stubbings or make them lenient.");
        msg
    }

    fn potential_stubbing_conflict(&self, findings: &[Finding]) -> String {
        let mut msg = String::from("Strict stubbing argument mismatch. Please check:\n");

        for call in findings
            .iter()
            .filter(|f| f.origin == FindingOrigin::Invocation)
        {
            msg.push_str(&format!(
                " - this invocation of '{}' method:\n    {}\n",
                call.method, call.description
            ));
            msg.push_str(&self.location_line(call, "    "));
        }

        msg.push_str(" - has following stubbing(s) with different arguments:\n");
        for (i, stub) in findings
            .iter()
            .filter(|f| f.origin == FindingOrigin::Stubbing)
            .enumerate()
        {
            msg.push_str(&format!("    {}. {}\n", i + 1, stub.description));
            msg.push_str(&self.location_line(stub, "      "));
        }

        msg.push_str(
            "Typically, stubbing argument mismatch indicates a mistake when writing tests.\n\
             Either fix the arguments of the call or of the stubbing, \
             or make the stubbing lenient.",
        );
        msg
    }

    fn unverified_interaction(&self, findings: &[Finding]) -> String {
        let Some(first) = findings.first() else {
            return String::from("No interactions wanted here.");
        };

        let mut msg = format!(
            "No interactions wanted here.\nBut found this interaction on mock '{}':\n    {}\n",
            first.mock, first.description
        );
        msg.push_str(&self.location_line(first, "    "));

        if findings.len() == 1 {
            msg.push_str("Actually, above is the only interaction with this mock.");
        } else {
            msg.push_str("***\nFor your reference, here is the list of all unverified interactions:\n");
            for (i, finding) in findings.iter().enumerate() {
                msg.push_str(&format!(
                    "  {}. {}{}\n",
                    i + 1,
                    finding.description,
                    self.at(finding)
                ));
            }
            msg.truncate(msg.trim_end().len());
        }
        msg
    }
}

impl Default for DefaultReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Reporter for DefaultReporter {
    fn render(&self, kind: FindingKind, findings: &[Finding]) -> String {
        match kind {
            FindingKind::UnnecessaryStubbing => self.unnecessary_stubbing(findings),
            FindingKind::PotentialStubbingConflict => self.potential_stubbing_conflict(findings),
            FindingKind::UnverifiedInteraction => self.unverified_interaction(findings),
        }
    }
}
