use crate::invocation::{DoubleId, Invocation};
use crate::matcher::ArgsPattern;
use crate::strictness::Strictness;
use crate::stubbing::{Answer, StubId, StubbingRecord};
use serde_json::Value;
use std::panic::Location;

/// Build an unregistered stubbing record returning `"stubbed"`.
///
/// The registry assigns the real id on registration.
#[track_caller]
pub(crate) fn record<const N: usize>(
    double: DoubleId,
    method: &str,
    args: [Value; N],
    strictness: Option<Strictness>,
) -> StubbingRecord {
    StubbingRecord {
        id: StubId(u64::MAX),
        double,
        mock_name: format!("mock{}", double.0),
        method: method.to_string(),
        pattern: ArgsPattern::from(args),
        answers: vec![Answer::Return(Value::from("stubbed"))],
        strictness,
        mock_strictness: None,
        use_count: 0,
        location: Location::caller(),
    }
}

/// Build an invocation as the interception entry point would.
#[track_caller]
pub(crate) fn invocation<const N: usize>(
    double: DoubleId,
    method: &str,
    args: [Value; N],
) -> Invocation {
    Invocation {
        double,
        mock_name: format!("mock{}", double.0),
        method: method.to_string(),
        args: args.to_vec(),
        sequence: 1,
        location: Location::caller(),
    }
}
