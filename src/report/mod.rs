//! Rendering of strictness findings into diagnostic text.
//!
//! Findings are plain ordered records; a [`Reporter`] turns a list of them into
//! the message carried by the corresponding error. Entries are enumerated from
//! 1 in the order given.

mod finding;
mod render;


// Re-export public API
pub use finding::{Finding, FindingKind, FindingOrigin};
pub use render::DefaultReporter;

/// Renders findings of one kind into human-readable text.
pub trait Reporter {
    fn render(&self, kind: FindingKind, findings: &[Finding]) -> String;
}
