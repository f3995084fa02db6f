//! In-Memory Record Store
//!
//! Same keying and ranking semantics as the directory store, minus the
//! filesystem. Backs the test suite and the demo binary.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::store::{Ranking, Record, RecordStore, StoreError};

/// Append-only in-memory record collection.
#[derive(Clone, Debug, Default)]
pub struct MemoryRecordStore {
    /// (unique key, record), in arrival order
    entries: Vec<(String, Record)>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in arrival order.
    pub fn records(&self) -> Vec<Record> {
        self.entries.iter().map(|(_, r)| r.clone()).collect()
    }

    /// Keys in leaderboard order.
    pub fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|(k, _)| k.clone()).collect();
        keys.sort();
        keys
    }

    /// Save with an explicit completion timestamp.
    ///
    /// `save_and_rank` delegates here with the current time; tests freeze
    /// the clock to exercise same-key arrival ordering deterministically.
    pub fn save_at(
        &mut self,
        error_count: u32,
        elapsed: Duration,
        created_at: DateTime<Utc>,
    ) -> Ranking {
        let record = Record::new(error_count, elapsed, created_at);

        // Identical keys stay distinct: a numeric suffix sorts directly
        // after its base key, preserving arrival order.
        let base = record.key();
        let mut key = base.clone();
        let mut duplicate = 0;
        while self.entries.iter().any(|(k, _)| *k == key) {
            duplicate += 1;
            key = format!("{base}-{duplicate}");
        }

        self.entries.push((key.clone(), record));

        let keys = self.sorted_keys();
        let rank = keys.iter().position(|k| *k == key).map(|i| i + 1).unwrap_or(0);
        debug_assert!(rank > 0, "freshly inserted key missing from listing");

        Ranking {
            rank: rank as u32,
            total: keys.len() as u32,
        }
    }
}

impl RecordStore for MemoryRecordStore {
    fn save_and_rank(
        &mut self,
        error_count: u32,
        elapsed: Duration,
    ) -> Result<Ranking, StoreError> {
        Ok(self.save_at(error_count, elapsed, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_error_count_dominates_regardless_of_save_order() {
        // Clean-but-slow first...
        let mut store = MemoryRecordStore::new();
        let clean = store.save_at(0, Duration::from_millis(1000), at(0));
        let touchy = store.save_at(2, Duration::from_millis(500), at(1));
        assert_eq!((clean.rank, clean.total), (1, 1));
        assert_eq!((touchy.rank, touchy.total), (2, 2));

        // ...and touchy-but-fast first.
        let mut store = MemoryRecordStore::new();
        let touchy = store.save_at(2, Duration::from_millis(500), at(0));
        let clean = store.save_at(0, Duration::from_millis(1000), at(1));
        assert_eq!((touchy.rank, touchy.total), (1, 1));
        assert_eq!((clean.rank, clean.total), (1, 2));
        assert_eq!(store.sorted_keys()[1], Record::new(2, Duration::from_millis(500), at(0)).key());
    }

    #[test]
    fn test_identical_scores_keep_arrival_order() {
        let mut store = MemoryRecordStore::new();
        let elapsed = Duration::from_millis(5000);

        // Same score, same frozen timestamp: the collision path.
        let first = store.save_at(1, elapsed, at(0));
        let second = store.save_at(1, elapsed, at(0));

        assert_eq!(store.len(), 2);
        assert_eq!(first.rank, 1);
        assert_eq!((second.rank, second.total), (2, 2));

        // A better round still slots ahead of both.
        let better = store.save_at(0, elapsed, at(0));
        assert_eq!((better.rank, better.total), (1, 3));
    }

    #[test]
    fn test_new_best_takes_first_place() {
        let mut store = MemoryRecordStore::new();
        store.save_at(3, Duration::from_millis(9000), at(0));
        store.save_at(1, Duration::from_millis(7000), at(1));
        let best = store.save_at(0, Duration::from_millis(8000), at(2));
        assert_eq!((best.rank, best.total), (1, 3));
    }

    #[test]
    fn test_zero_elapsed_is_accepted() {
        let mut store = MemoryRecordStore::new();
        let ranking = store.save_at(0, Duration::ZERO, at(0));
        assert_eq!((ranking.rank, ranking.total), (1, 1));
        assert_eq!(store.records()[0].elapsed_ms, 0);
    }

    #[test]
    fn test_save_and_rank_uses_wall_clock() {
        let mut store = MemoryRecordStore::new();
        store.save_and_rank(1, Duration::from_secs(1)).unwrap();
        store.save_and_rank(1, Duration::from_secs(1)).unwrap();
        assert_eq!(store.len(), 2);
    }
}
