//! Persistence substrate for the grid ledger.
//!
//! The ledger itself keeps authoritative state in memory; a [`LedgerStore`]
//! is the durable write-through behind it. Any embedded key/row store can
//! satisfy this trait; the schema is internal to the crate, not a public
//! wire format. Persistence is best-effort: callers log store failures and
//! keep going.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::GridCoord;

use super::{CellRecord, ObstacleRecord};

/// Storage-layer failure. Never fatal to an exploration cycle.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// One replayable ledger mutation.
///
/// Entries carry the full post-mutation record, so replaying a journal is
/// simply "last entry per cell wins".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JournalEntry {
    Visit {
        cell: GridCoord,
        record: CellRecord,
    },
    Obstacle {
        cell: GridCoord,
        record: ObstacleRecord,
    },
}

/// Durable backing store for ledger mutations.
pub trait LedgerStore: Send {
    /// Persist the post-visit state of a cell.
    fn append_visit(&mut self, cell: GridCoord, record: &CellRecord) -> Result<(), StoreError>;

    /// Persist the latest obstacle observation for a cell.
    fn append_obstacle(
        &mut self,
        cell: GridCoord,
        record: &ObstacleRecord,
    ) -> Result<(), StoreError>;

    /// Drop all persisted records.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// In-memory-only substrate: the ledger state dies with the process.
///
/// Used by tests and by deployments that do not care about resuming a map.
#[derive(Debug, Default)]
pub struct EphemeralStore;

impl LedgerStore for EphemeralStore {
    fn append_visit(&mut self, _cell: GridCoord, _record: &CellRecord) -> Result<(), StoreError> {
        Ok(())
    }

    fn append_obstacle(
        &mut self,
        _cell: GridCoord,
        _record: &ObstacleRecord,
    ) -> Result<(), StoreError> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}
