//! Mock registry: per-double storage of stubbing records in registration order.

use crate::invocation::DoubleId;
use crate::stubbing::{StubId, StubbingRecord};
use serde_json::Value;
use std::collections::HashMap;

/// Stubbing records of one session.
///
/// Records are stored in session-wide registration order; the per-double
/// index keeps each double's records in the same order.
#[derive(Debug, Default)]
pub(crate) struct MockRegistry {
    records: Vec<StubbingRecord>,
    by_double: HashMap<DoubleId, Vec<usize>>,
}

impl MockRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a record, assigning the next registration sequence number.
    pub(crate) fn register(&mut self, mut record: StubbingRecord) -> StubId {
        let index = self.records.len();
        let id = StubId(index as u64);
        record.id = id;
        self.by_double.entry(record.double).or_default().push(index);
        self.records.push(record);
        id
    }

    /// Records of `double` for `method`, most recently registered first.
    pub(crate) fn records_for<'a>(
        &'a self,
        double: DoubleId,
        method: &'a str,
    ) -> impl Iterator<Item = &'a StubbingRecord> + 'a {
        self.indices(double)
            .iter()
            .rev()
            .map(move |&i| &self.records[i])
            .filter(move |r| r.method == method)
    }

    /// Every record of the session, in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &StubbingRecord> {
        self.records.iter()
    }

    pub(crate) fn get(&self, id: StubId) -> Option<&StubbingRecord> {
        self.records.get(id.0 as usize)
    }

    pub(crate) fn get_mut(&mut self, id: StubId) -> Option<&mut StubbingRecord> {
        self.records.get_mut(id.0 as usize)
    }

    /// The most recent record of `double` for `method` whose pattern accepts `args`.
    pub(crate) fn first_match_mut(
        &mut self,
        double: DoubleId,
        method: &str,
        args: &[Value],
    ) -> Option<&mut StubbingRecord> {
        let records = &mut self.records;
        let index = self
            .by_double
            .get(&double)?
            .iter()
            .rev()
            .copied()
            .find(|&i| records[i].method == method && records[i].pattern.matches(args))?;
        records.get_mut(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    fn indices(&self, double: DoubleId) -> &[usize] {
        self.by_double
            .get(&double)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
