// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Record;
use std::collections::HashSet;
use time::UtcOffset;

/// Distinct values in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the value was already present.
    pub fn insert(&mut self, value: &str) -> bool {
        if self.seen.contains(value) {
            return false;
        }
        self.seen.insert(value.to_owned());
        self.items.push(value.to_owned());
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

/// Search and group matching over a snapshot. All matching is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterEngine {
    display_offset: UtcOffset,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl FilterEngine {
    /// `display_offset` decides how timestamps are rendered for search.
    pub const fn new(display_offset: UtcOffset) -> Self {
        Self { display_offset }
    }

    pub const fn display_offset(&self) -> UtcOffset {
        self.display_offset
    }

    /// A selected group wins over the search term; with neither, the
    /// snapshot comes back unchanged.
    pub fn filter(
        &self,
        snapshot: &[Record],
        search_term: &str,
        selected_group: &str,
    ) -> Vec<Record> {
        if !selected_group.is_empty() {
            return snapshot
                .iter()
                .filter(|record| record.beneficiary_mobile.as_deref() == Some(selected_group))
                .cloned()
                .collect();
        }
        if !search_term.is_empty() {
            return snapshot
                .iter()
                .filter(|record| self.matches_search(record, search_term))
                .cloned()
                .collect();
        }
        snapshot.to_vec()
    }

    pub fn matches_search(&self, record: &Record, search_term: &str) -> bool {
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|value| value.contains(search_term))
        };

        contains(&record.beneficiary_mobile)
            || contains(&record.beneficiary_id)
            || contains(&record.trxid)
            || record
                .timestamp_text(self.display_offset)
                .is_some_and(|text| text.contains(search_term))
    }

    pub fn group_keys(&self, snapshot: &[Record], search_term: &str) -> Vec<String> {
        let mut keys = OrderedSet::new();
        for key in snapshot.iter().filter_map(Record::group_key) {
            if search_term.is_empty() || key.contains(search_term) {
                keys.insert(key);
            }
        }
        keys.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterEngine, OrderedSet};
    use crate::Record;
    use time::OffsetDateTime;
    use time::macros::{datetime, offset};

    fn record(
        id: &str,
        mobile: Option<&str>,
        beneficiary_id: Option<&str>,
        trxid: Option<&str>,
        timestamp: Option<OffsetDateTime>,
    ) -> Record {
        Record {
            id: id.to_owned(),
            beneficiary_id: beneficiary_id.map(str::to_owned),
            beneficiary_mobile: mobile.map(str::to_owned),
            trxid: trxid.map(str::to_owned),
            timestamp,
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record(
                "r1",
                Some("01711000001"),
                Some("501"),
                Some("TXA100"),
                Some(datetime!(2026-03-07 14:05:09 UTC)),
            ),
            record(
                "r2",
                Some("01822000002"),
                Some("502"),
                Some("TXB200"),
                Some(datetime!(2026-03-06 9:15:00 UTC)),
            ),
            record("r3", Some("01711000001"), None, None, None),
            record("r4", None, Some("777"), Some("txa777"), None),
            record("r5", Some(""), None, Some("TXC300"), None),
        ]
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|record| record.id.as_str()).collect()
    }

    #[test]
    fn ordered_set_keeps_first_appearance() {
        let mut set = OrderedSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        assert!(set.contains("a"));
        assert_eq!(set.len(), 2);
        assert_eq!(set.into_vec(), vec!["b".to_owned(), "a".to_owned()]);
    }

    #[test]
    fn no_query_returns_snapshot_in_order() {
        let snapshot = sample();
        let filtered = FilterEngine::default().filter(&snapshot, "", "");
        assert_eq!(filtered, snapshot);
    }

    #[test]
    fn selected_group_is_exact_and_complete() {
        let snapshot = sample();
        let filtered = FilterEngine::default().filter(&snapshot, "", "01711000001");
        assert_eq!(ids(&filtered), vec!["r1", "r3"]);
        assert!(
            filtered
                .iter()
                .all(|record| record.beneficiary_mobile.as_deref() == Some("01711000001"))
        );

        let partial = FilterEngine::default().filter(&snapshot, "", "0171100000");
        assert!(partial.is_empty(), "group match must not be a substring test");
    }

    #[test]
    fn selected_group_ignores_search_term() {
        let snapshot = sample();
        let filtered = FilterEngine::default().filter(&snapshot, "TXB", "01711000001");
        assert_eq!(ids(&filtered), vec!["r1", "r3"]);
    }

    #[test]
    fn search_matches_any_present_field() {
        let engine = FilterEngine::default();
        let snapshot = sample();
        assert_eq!(ids(&engine.filter(&snapshot, "01822", "")), vec!["r2"]);
        assert_eq!(ids(&engine.filter(&snapshot, "77", "")), vec!["r4"]);
        assert_eq!(ids(&engine.filter(&snapshot, "TXC", "")), vec!["r5"]);
        assert_eq!(ids(&engine.filter(&snapshot, "2:05:09 PM", "")), vec!["r1"]);
        assert_eq!(ids(&engine.filter(&snapshot, "3/6/2026", "")), vec!["r2"]);
        assert!(engine.filter(&snapshot, "nothing-here", "").is_empty());
    }

    #[test]
    fn search_is_case_sensitive() {
        let engine = FilterEngine::default();
        let snapshot = sample();
        assert_eq!(ids(&engine.filter(&snapshot, "TXA", "")), vec!["r1"]);
        assert_eq!(ids(&engine.filter(&snapshot, "txa", "")), vec!["r4"]);
    }

    #[test]
    fn absent_fields_never_match() {
        let engine = FilterEngine::default();
        let bare = record("bare", None, None, None, None);
        assert!(!engine.matches_search(&bare, "a"));
        assert!(!engine.matches_search(&bare, "minutes"));
    }

    #[test]
    fn timestamp_search_uses_display_offset() {
        let snapshot = sample();
        let shifted = FilterEngine::new(offset!(+10:00));
        assert_eq!(ids(&shifted.filter(&snapshot, "3/8/2026", "")), vec!["r1"]);
        assert!(FilterEngine::default().filter(&snapshot, "3/8/2026", "").is_empty());
    }

    #[test]
    fn group_keys_are_unique_and_non_empty() {
        let keys = FilterEngine::default().group_keys(&sample(), "");
        assert_eq!(
            keys,
            vec!["01711000001".to_owned(), "01822000002".to_owned()]
        );
    }

    #[test]
    fn group_keys_respect_search_term() {
        let engine = FilterEngine::default();
        assert_eq!(
            engine.group_keys(&sample(), "0182"),
            vec!["01822000002".to_owned()]
        );
        assert!(engine.group_keys(&sample(), "TXA").is_empty());
        assert!(engine.group_keys(&[], "").is_empty());
    }
}
