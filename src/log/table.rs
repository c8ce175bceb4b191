use crate::log::record::{Column, MetricRecord};

/// In-memory, ordered view of the run log for one tick.
///
/// Row order is file order. Built fresh by the loader on every tick and
/// never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricTable {
    records: Vec<MetricRecord>,
}

impl MetricTable {
    pub fn new(records: Vec<MetricRecord>) -> Self {
        MetricTable { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    /// The most recent row, if any.
    pub fn last(&self) -> Option<&MetricRecord> {
        self.records.last()
    }

    pub fn steps(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.step).collect()
    }

    /// Extracts one column as a float series, in row order.
    pub fn column(&self, column: Column) -> Vec<f64> {
        self.records.iter().map(|r| r.get(column)).collect()
    }
}

impl From<Vec<MetricRecord>> for MetricTable {
    fn from(records: Vec<MetricRecord>) -> Self {
        MetricTable::new(records)
    }
}
