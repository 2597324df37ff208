//! strictmock: the stubbing-strictness engine of a call-interception test library.
//!
//! Test doubles register stubbed behaviors into a [`MockingSession`]. Every call
//! on a double is routed through the session, which classifies it against the
//! registered stubbings and fails fast on strict argument mismatches. When the
//! session finishes, strict stubbings that were never used are reported as a
//! single aggregated failure.
//!
//! ```
//! use serde_json::json;
//! use strictmock::{MockingSession, Strictness, StrictnessError};
//!
//! let session = MockingSession::start(Strictness::Strict);
//! let mock = session.mock("mock")?;
//!
//! mock.stub("simple_method", [json!("1")]).then_return("one")?;
//! mock.stub("different_method", [json!("2")]).lenient().then_return("two")?;
//!
//! assert_eq!(mock.call("simple_method", [json!("1")])?, json!("one"));
//! assert_eq!(mock.call("different_method", [json!("200")])?, json!(null));
//!
//! let err = mock.call("simple_method", [json!("100")]).unwrap_err();
//! assert!(matches!(err, StrictnessError::PotentialStubbingProblem { .. }));
//! # Ok::<(), StrictnessError>(())
//! ```

mod classifier;
pub mod config;
pub mod double;
pub mod error;
pub mod events;
pub mod invocation;
pub mod matcher;
mod registry;
pub mod report;
pub mod session;
pub mod strictness;
pub mod stubbing;

#[cfg(test)]
mod test_support;

pub use config::SessionConfig;
pub use double::{Double, MockSettings};
pub use error::{Result, StrictnessError};
pub use events::{SessionAction, SessionEvent};
pub use invocation::{Classification, DoubleId, Invocation};
pub use matcher::{ArgsPattern, ArgumentMatcher, any, arg_that, eq, matches_regex};
pub use report::{DefaultReporter, Finding, FindingKind, FindingOrigin, Reporter};
pub use session::{MockingSession, SessionBuilder, VerificationMode};
pub use strictness::Strictness;
pub use stubbing::{StubId, StubbingBuilder, StubbingHandle};
