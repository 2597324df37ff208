//! Stubbing records and the registration API.
//!
//! A stubbing is registered once its first answer is supplied:
//!
//! ```
//! use serde_json::json;
//! use strictmock::{MockingSession, Strictness};
//!
//! let session = MockingSession::start(Strictness::Strict);
//! let mock = session.mock("repo")?;
//!
//! let handle = mock
//!     .stub("find", [json!(1)])
//!     .then_return("first")?
//!     .then_return("second")?;
//!
//! assert_eq!(mock.call("find", [json!(1)])?, json!("first"));
//! assert_eq!(mock.call("find", [json!(1)])?, json!("second"));
//! assert_eq!(mock.call("find", [json!(1)])?, json!("second"));
//! assert_eq!(handle.use_count()?, 3);
//! # Ok::<(), strictmock::StrictnessError>(())
//! ```

mod builder;
mod record;

pub use builder::{StubbingBuilder, StubbingHandle};
pub use record::{StubId, StubbingRecord};

pub(crate) use builder::StubbingDraft;
pub(crate) use record::Answer;
