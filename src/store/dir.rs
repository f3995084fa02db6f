//! Directory-Backed Record Store
//!
//! One marker file per completed round, named by the sortable record key.
//! The file *name* carries the whole ordering contract; the body holds the
//! JSON-serialized record so scores can be read back without parsing names.
//! Files are only ever created, never rewritten or removed.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::store::{Ranking, Record, RecordStore, StoreError};

/// Default records directory, relative to the working directory.
pub const DEFAULT_RECORDS_DIR: &str = "records";

/// Append-only record collection persisted as a flat directory of markers.
#[derive(Clone, Debug)]
pub struct DirRecordStore {
    dir: PathBuf,
}

impl DirRecordStore {
    /// Store records under `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store records under [`DEFAULT_RECORDS_DIR`].
    pub fn default_location() -> Self {
        Self::new(DEFAULT_RECORDS_DIR)
    }

    /// The records directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save with an explicit completion timestamp.
    ///
    /// `save_and_rank` delegates here with the current time; tests freeze
    /// the clock to exercise same-key collisions deterministically.
    pub fn save_at(
        &mut self,
        error_count: u32,
        elapsed: Duration,
        created_at: DateTime<Utc>,
    ) -> Result<Ranking, StoreError> {
        fs::create_dir_all(&self.dir)?;

        let record = Record::new(error_count, elapsed, created_at);
        let body = serde_json::to_vec_pretty(&record)?;
        let name = self.create_marker(&record.key(), &body)?;
        debug!(%name, "record written");

        // Re-derive the ordered collection: rank is the 1-based position of
        // the new marker in the full sorted listing.
        let names = self.sorted_names()?;
        let rank = names.iter().position(|n| *n == name).map(|i| i + 1).unwrap_or(0);
        debug_assert!(rank > 0, "freshly written marker missing from listing");

        Ok(Ranking {
            rank: rank as u32,
            total: names.len() as u32,
        })
    }

    /// All marker names in leaderboard order.
    pub fn sorted_names(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    /// Create the marker file, never clobbering an existing record: a key
    /// collision gets a numeric suffix that sorts directly after its base,
    /// keeping arrival order.
    fn create_marker(&self, key: &str, body: &[u8]) -> Result<String, StoreError> {
        let mut name = key.to_string();
        let mut duplicate = 0;
        loop {
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.dir.join(&name))
            {
                Ok(mut file) => {
                    file.write_all(body)?;
                    return Ok(name);
                }
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                    duplicate += 1;
                    name = format!("{key}-{duplicate}");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

impl RecordStore for DirRecordStore {
    fn save_and_rank(
        &mut self,
        error_count: u32,
        elapsed: Duration,
    ) -> Result<Ranking, StoreError> {
        self.save_at(error_count, elapsed, Utc::now())
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
    fn test_directory_created_on_first_save() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("records");
        let mut store = DirRecordStore::new(&dir);
        assert!(!dir.exists());

        let ranking = store.save_at(0, Duration::from_millis(1500), at(0)).unwrap();
        assert_eq!((ranking.rank, ranking.total), (1, 1));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_marker_name_is_the_record_key() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = DirRecordStore::new(tmp.path().join("records"));

        let created = at(0);
        store.save_at(3, Duration::from_millis(1333), created).unwrap();

        let names = store.sorted_names().unwrap();
        assert_eq!(names, vec![Record::new(3, Duration::from_millis(1333), created).key()]);
    }

    #[test]
    fn test_marker_body_reads_back_as_the_record() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = DirRecordStore::new(tmp.path().join("records"));

        let created = at(0);
        store.save_at(2, Duration::from_millis(750), created).unwrap();

        let name = store.sorted_names().unwrap().remove(0);
        let body = fs::read(store.dir().join(name)).unwrap();
        let record: Record = serde_json::from_slice(&body).unwrap();
        assert_eq!(record, Record::new(2, Duration::from_millis(750), created));
    }

    #[test]
    fn test_ranking_across_saves() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = DirRecordStore::new(tmp.path().join("records"));

        let touchy = store.save_at(2, Duration::from_millis(500), at(0)).unwrap();
        assert_eq!((touchy.rank, touchy.total), (1, 1));

        // Fewer errors wins despite the slower time.
        let clean = store.save_at(0, Duration::from_millis(1000), at(1)).unwrap();
        assert_eq!((clean.rank, clean.total), (1, 2));

        let middling = store.save_at(1, Duration::from_millis(200), at(2)).unwrap();
        assert_eq!((middling.rank, middling.total), (2, 3));
    }

    #[test]
    fn test_key_collision_keeps_both_markers_in_arrival_order() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = DirRecordStore::new(tmp.path().join("records"));

        let elapsed = Duration::from_millis(5000);
        let first = store.save_at(1, elapsed, at(0)).unwrap();
        let second = store.save_at(1, elapsed, at(0)).unwrap();

        assert_eq!(first.rank, 1);
        assert_eq!((second.rank, second.total), (2, 2));
        assert_eq!(store.sorted_names().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_directory_surfaces_as_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DirRecordStore::new(tmp.path().join("nope"));
        let err = store.sorted_names().unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
