// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Record;

/// The current snapshot, most recent record first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot wholesale. Records without a timestamp go last,
    /// keeping their relative order.
    pub fn load(&mut self, records: Option<Vec<Record>>) {
        let mut records = records.unwrap_or_default();
        // Stable sort; `None` orders before any instant, so descending puts it last.
        records.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));
        self.records = records;
    }

    pub fn snapshot(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::RecordStore;
    use crate::Record;
    use time::OffsetDateTime;
    use time::macros::datetime;

    fn record(id: &str, timestamp: Option<OffsetDateTime>) -> Record {
        Record {
            id: id.to_owned(),
            beneficiary_id: None,
            beneficiary_mobile: None,
            trxid: None,
            timestamp,
        }
    }

    fn ids(store: &RecordStore) -> Vec<&str> {
        store
            .snapshot()
            .iter()
            .map(|record| record.id.as_str())
            .collect()
    }

    #[test]
    fn load_sorts_most_recent_first() {
        let mut store = RecordStore::new();
        store.load(Some(vec![
            record("old", Some(datetime!(2026-01-01 8:00 UTC))),
            record("new", Some(datetime!(2026-03-01 8:00 UTC))),
            record("mid", Some(datetime!(2026-02-01 8:00 UTC))),
        ]));
        assert_eq!(ids(&store), vec!["new", "mid", "old"]);
    }

    #[test]
    fn undated_records_sort_last_in_input_order() {
        let mut store = RecordStore::new();
        store.load(Some(vec![
            record("undated-a", None),
            record("dated", Some(datetime!(1970-01-01 0:00 UTC))),
            record("undated-b", None),
        ]));
        assert_eq!(ids(&store), vec!["dated", "undated-a", "undated-b"]);
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let at = Some(datetime!(2026-02-01 8:00 UTC));
        let mut store = RecordStore::new();
        store.load(Some(vec![record("first", at), record("second", at)]));
        assert_eq!(ids(&store), vec!["first", "second"]);
    }

    #[test]
    fn absent_or_empty_load_clears_snapshot() {
        let mut store = RecordStore::new();
        store.load(Some(vec![record("a", None)]));
        assert_eq!(store.len(), 1);

        store.load(None);
        assert!(store.is_empty());

        store.load(Some(vec![record("b", None)]));
        store.load(Some(Vec::new()));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn load_does_not_deduplicate_ids() {
        let mut store = RecordStore::new();
        store.load(Some(vec![record("dup", None), record("dup", None)]));
        assert_eq!(store.len(), 2);
    }
}
