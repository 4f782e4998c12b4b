//! Append-only JSON-lines journal store.
//!
//! Each ledger mutation is one JSON object per line. On open, the journal
//! is replayed front to back; later entries for the same cell supersede
//! earlier ones, so no compaction is needed for correctness (only for disk
//! usage, which stays small at exploration rates).

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::warn;

use crate::core::types::GridCoord;

use super::store::{JournalEntry, LedgerStore, StoreError};
use super::{CellRecord, ObstacleRecord};

/// File-backed journal implementing [`LedgerStore`].
pub struct JournalStore {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl JournalStore {
    /// Open (or create) a journal and replay its existing entries.
    ///
    /// Corrupt lines are skipped with a warning rather than failing the
    /// open: a partially written trailing line after a crash must not brick
    /// the robot.
    pub fn open(path: &Path) -> Result<(Self, Vec<JournalEntry>), StoreError> {
        let mut entries = Vec::new();

        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            for (idx, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<JournalEntry>(&line) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => {
                        warn!("Skipping corrupt journal line {}: {}", idx + 1, e);
                    }
                }
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok((
            Self {
                path: path.to_path_buf(),
                writer: BufWriter::new(file),
            },
            entries,
        ))
    }

    fn append(&mut self, entry: &JournalEntry) -> Result<(), StoreError> {
        serde_json::to_writer(&mut self.writer, entry)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl LedgerStore for JournalStore {
    fn append_visit(&mut self, cell: GridCoord, record: &CellRecord) -> Result<(), StoreError> {
        self.append(&JournalEntry::Visit {
            cell,
            record: record.clone(),
        })
    }

    fn append_obstacle(
        &mut self,
        cell: GridCoord,
        record: &ObstacleRecord,
    ) -> Result<(), StoreError> {
        self.append(&JournalEntry::Obstacle {
            cell,
            record: record.clone(),
        })
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.writer = BufWriter::new(file);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit_record(count: u32) -> CellRecord {
        CellRecord {
            visit_count: count,
            min_distance_cm: 999.0,
            last_visited_us: 42,
            obstacle_seen: false,
        }
    }

    #[test]
    fn test_roundtrip_replay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");

        {
            let (mut store, entries) = JournalStore::open(&path).unwrap();
            assert!(entries.is_empty());
            store
                .append_visit(GridCoord::new(3, 4), &visit_record(1))
                .unwrap();
            store
                .append_visit(GridCoord::new(3, 4), &visit_record(2))
                .unwrap();
            store
                .append_obstacle(
                    GridCoord::new(5, 5),
                    &ObstacleRecord {
                        confidence: 0.8,
                        last_observed_us: 99,
                    },
                )
                .unwrap();
        }

        let (_store, entries) = JournalStore::open(&path).unwrap();
        assert_eq!(entries.len(), 3);
        match &entries[1] {
            JournalEntry::Visit { cell, record } => {
                assert_eq!(*cell, GridCoord::new(3, 4));
                assert_eq!(record.visit_count, 2);
            }
            other => panic!("unexpected entry: {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_line_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");

        {
            let (mut store, _) = JournalStore::open(&path).unwrap();
            store
                .append_visit(GridCoord::new(1, 1), &visit_record(1))
                .unwrap();
        }
        // Simulate a torn write.
        {
            use std::io::Write as _;
            let mut f = OpenOptions::new().append(true).open(&path).unwrap();
            f.write_all(b"{\"kind\":\"visit\",\"cel").unwrap();
        }

        let (_store, entries) = JournalStore::open(&path).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_clear_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");

        let (mut store, _) = JournalStore::open(&path).unwrap();
        store
            .append_visit(GridCoord::new(1, 1), &visit_record(1))
            .unwrap();
        store.clear().unwrap();
        store
            .append_visit(GridCoord::new(2, 2), &visit_record(1))
            .unwrap();
        drop(store);

        let (_store, entries) = JournalStore::open(&path).unwrap();
        assert_eq!(entries.len(), 1);
        match &entries[0] {
            JournalEntry::Visit { cell, .. } => assert_eq!(*cell, GridCoord::new(2, 2)),
            other => panic!("unexpected entry: {:?}", other),
        }
    }
}
