//! Leaderboard Persistence
//!
//! A finished round becomes an immutable record; the store appends it and
//! answers one question: where does this round rank among everything ever
//! played? Ordering lives entirely in the record *key* (see [`key`]), so
//! sorting the textual keys reproduces the leaderboard without a separate
//! comparator.
//!
//! ## Module Structure
//!
//! - `key`: sortable record-key codec
//! - `dir`: one marker file per record under a records directory
//! - `memory`: in-memory store for tests and demos

pub mod dir;
pub mod key;
pub mod memory;

// Re-export key types
pub use dir::DirRecordStore;
pub use key::record_key;
pub use memory::MemoryRecordStore;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// RECORD
// =============================================================================

/// An immutable, persisted fact about one completed round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Wire contacts during the round
    pub error_count: u32,
    /// Round duration in whole milliseconds (truncated)
    pub elapsed_ms: u64,
    /// Wall-clock completion time; tertiary sort key
    pub created_at: DateTime<Utc>,
}

impl Record {
    /// Build a record completed at `created_at`.
    pub fn new(error_count: u32, elapsed: Duration, created_at: DateTime<Utc>) -> Self {
        Self {
            error_count,
            elapsed_ms: elapsed.as_millis() as u64,
            created_at,
        }
    }

    /// The record's sortable key.
    pub fn key(&self) -> String {
        key::record_key(self.error_count, self.elapsed_ms, self.created_at)
    }
}

// =============================================================================
// RANKING
// =============================================================================

/// Position of a freshly saved record within the whole leaderboard.
///
/// Derived at save time and returned once; never cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    /// 1-based position, best first
    pub rank: u32,
    /// Leaderboard size including the new record
    pub total: u32,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Record store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Records directory or marker file could not be written or listed.
    #[error("record storage I/O: {0}")]
    Io(#[from] std::io::Error),

    /// Record body could not be serialized.
    #[error("record encoding: {0}")]
    Encode(#[from] serde_json::Error),
}

// =============================================================================
// RECORD STORE
// =============================================================================

/// Append-only record collection with rank derivation.
///
/// `save_and_rank` is the store's single operation: persist a uniquely-keyed
/// record for the finished round and return its 1-based rank plus the new
/// collection size. Existing records are never modified or removed.
pub trait RecordStore {
    /// Persist one finished round and rank it among all stored records.
    fn save_and_rank(&mut self, error_count: u32, elapsed: Duration)
        -> Result<Ranking, StoreError>;
}

// =============================================================================
// SHARED HANDLE
// =============================================================================

/// Cloneable handle sharing one store between an owner and observers.
///
/// The machine owns its store capability as a box; tests (and any tooling
/// that wants to inspect the leaderboard while the game runs) keep a second
/// handle to the same underlying store.
#[derive(Debug, Default)]
pub struct SharedStore<S>(Arc<Mutex<S>>);

impl<S> SharedStore<S> {
    /// Wrap a store in a shared handle.
    pub fn new(store: S) -> Self {
        Self(Arc::new(Mutex::new(store)))
    }

    /// Run a closure against the underlying store.
    pub fn with<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        f(&self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, S> {
        // A poisoned lock only means a panic elsewhere; the records
        // themselves are still valid.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<S> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<S: RecordStore> RecordStore for SharedStore<S> {
    fn save_and_rank(
        &mut self,
        error_count: u32,
        elapsed: Duration,
    ) -> Result<Ranking, StoreError> {
        self.lock().save_and_rank(error_count, elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_trip_through_json() {
        let record = Record::new(3, Duration::from_millis(1333), Utc::now());
        let json = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_shared_store_sees_saves_from_clone() {
        let shared = SharedStore::new(MemoryRecordStore::new());
        let mut handle: Box<dyn RecordStore + Send> = Box::new(shared.clone());

        handle.save_and_rank(1, Duration::from_secs(2)).unwrap();
        assert_eq!(shared.with(|s| s.len()), 1);
    }
}
