//! Grid-backed visit and obstacle ledger.
//!
//! The ledger is the durable memory of exploration: how often each grid
//! cell has been visited, where obstacles were seen and with what
//! confidence. It is shared between the exploration loop (writer) and
//! external status/map queries (readers); all access goes through its own
//! methods, and a reader never observes a partially updated cell or a
//! half-cleared table.

mod journal;
mod store;

pub use journal::JournalStore;
pub use store::{EphemeralStore, JournalEntry, LedgerStore, StoreError};

use std::collections::HashMap;
use std::path::Path;

use log::warn;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::core::math::heading_to_unit_step;
use crate::core::types::GridCoord;
use crate::utils::now_us;

/// Distance sentinel for cells visited without a resolved measurement.
pub const UNMEASURED_DISTANCE_CM: f32 = 999.0;

/// Per-cell visit bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Number of recorded visits (>= 1 once the record exists).
    pub visit_count: u32,
    /// Minimum obstacle distance ever observed from this cell (cm).
    pub min_distance_cm: f32,
    /// Timestamp of the latest visit, microseconds since the epoch.
    pub last_visited_us: u64,
    /// Whether an obstacle was observed during any visit.
    pub obstacle_seen: bool,
}

/// Per-cell obstacle observation. Latest value wins; no averaging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRecord {
    /// Confidence of the latest observation, 0.0..=1.0.
    pub confidence: f32,
    /// Timestamp of the latest observation, microseconds since the epoch.
    pub last_observed_us: u64,
}

/// Read-only dump of the ledger for map rendering and API queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapSnapshot {
    /// Visited cells as `(x, y, visit_count)`.
    pub visited: Vec<(i32, i32, u32)>,
    /// Obstacle cells as `(x, y, confidence)`.
    pub obstacles: Vec<(i32, i32, f32)>,
}

#[derive(Debug, Default)]
struct LedgerInner {
    visits: HashMap<GridCoord, CellRecord>,
    obstacles: HashMap<GridCoord, ObstacleRecord>,
}

/// Durable visit/obstacle store over a bounded grid.
///
/// In-memory state is authoritative; the [`LedgerStore`] behind it is a
/// best-effort write-through. A transient storage failure is logged and
/// never aborts the exploration cycle.
pub struct GridLedger {
    inner: RwLock<LedgerInner>,
    store: Mutex<Box<dyn LedgerStore>>,
    grid: GridConfig,
}

impl GridLedger {
    /// Ledger with no durable backing.
    pub fn in_memory(grid: GridConfig) -> Self {
        Self::with_store(grid, Box::new(EphemeralStore), Vec::new())
    }

    /// Ledger backed by a JSON-lines journal at `path`, resuming any
    /// previously journaled state.
    pub fn open(grid: GridConfig, path: &Path) -> Result<Self, StoreError> {
        let (store, entries) = JournalStore::open(path)?;
        Ok(Self::with_store(grid, Box::new(store), entries))
    }

    /// Ledger over an arbitrary store, pre-seeded with replayed entries.
    pub fn with_store(
        grid: GridConfig,
        store: Box<dyn LedgerStore>,
        replay: Vec<JournalEntry>,
    ) -> Self {
        let mut inner = LedgerInner::default();
        for entry in replay {
            match entry {
                JournalEntry::Visit { cell, record } => {
                    inner.visits.insert(cell, record);
                }
                JournalEntry::Obstacle { cell, record } => {
                    inner.obstacles.insert(cell, record);
                }
            }
        }

        Self {
            inner: RwLock::new(inner),
            store: Mutex::new(store),
            grid,
        }
    }

    fn clamp(&self, cell: GridCoord) -> GridCoord {
        cell.clamped(self.grid.width, self.grid.height)
    }

    /// Record a visit to a cell: increment its count (creating it at 1),
    /// refresh the visit timestamp and keep the minimum observed distance.
    ///
    /// Storage write-through failures are logged and swallowed.
    pub fn record_visit(&self, cell: GridCoord, obstacle_observed: bool, distance_cm: f32) {
        let cell = self.clamp(cell);
        let distance_cm = if distance_cm.is_finite() {
            distance_cm
        } else {
            UNMEASURED_DISTANCE_CM
        };

        let record = {
            let mut inner = self.inner.write();
            let record = inner.visits.entry(cell).or_insert(CellRecord {
                visit_count: 0,
                min_distance_cm: UNMEASURED_DISTANCE_CM,
                last_visited_us: 0,
                obstacle_seen: false,
            });
            record.visit_count += 1;
            record.last_visited_us = now_us();
            record.obstacle_seen |= obstacle_observed;
            if distance_cm < record.min_distance_cm {
                record.min_distance_cm = distance_cm;
            }
            record.clone()
        };

        if let Err(e) = self.store.lock().append_visit(cell, &record) {
            warn!("Ledger visit write-through failed for {:?}: {}", cell, e);
        }
    }

    /// Visit count for a cell; 0 for cells never visited.
    pub fn visit_count(&self, cell: GridCoord) -> u32 {
        let cell = self.clamp(cell);
        self.inner
            .read()
            .visits
            .get(&cell)
            .map(|r| r.visit_count)
            .unwrap_or(0)
    }

    /// Whether a cell has reached the configured visit ceiling.
    pub fn is_overvisited(&self, cell: GridCoord) -> bool {
        self.visit_count(cell) >= self.grid.max_visits_per_cell
    }

    /// Record (or refresh) an obstacle observation. The latest confidence
    /// replaces any earlier value: the simplest deterministic policy.
    pub fn record_obstacle(&self, cell: GridCoord, confidence: f32) {
        let cell = self.clamp(cell);
        let record = ObstacleRecord {
            confidence: confidence.clamp(0.0, 1.0),
            last_observed_us: now_us(),
        };

        self.inner.write().obstacles.insert(cell, record.clone());

        if let Err(e) = self.store.lock().append_obstacle(cell, &record) {
            warn!(
                "Ledger obstacle write-through failed for {:?}: {}",
                cell, e
            );
        }
    }

    /// All obstacle records within a Chebyshev radius of `cell`
    /// (`|dx| <= radius` and `|dy| <= radius`, matching the rectangular
    /// grid model).
    pub fn nearby_obstacles(&self, cell: GridCoord, radius: i32) -> Vec<(GridCoord, f32)> {
        let cell = self.clamp(cell);
        self.inner
            .read()
            .obstacles
            .iter()
            .filter(|(c, _)| cell.chebyshev(**c) <= radius)
            .map(|(c, r)| (*c, r.confidence))
            .collect()
    }

    /// Among candidate headings, the one whose unit-step neighbor has the
    /// lowest visit count. Ties break in candidate order: first listed
    /// wins. Returns `None` only for an empty candidate list.
    pub fn least_visited_neighbor(&self, cell: GridCoord, candidates: &[f32]) -> Option<f32> {
        let cell = self.clamp(cell);
        let inner = self.inner.read();

        let mut best: Option<(f32, u32)> = None;
        for &heading in candidates {
            let (dx, dy) = heading_to_unit_step(heading);
            let neighbor = self.clamp(cell.offset(dx, dy));
            let visits = inner
                .visits
                .get(&neighbor)
                .map(|r| r.visit_count)
                .unwrap_or(0);
            // Strict comparison keeps the first-listed candidate on ties.
            if best.map_or(true, |(_, v)| visits < v) {
                best = Some((heading, visits));
            }
        }
        best.map(|(h, _)| h)
    }

    /// Clear all records. Atomic with respect to concurrent readers: the
    /// table swap happens under the write lock, so a reader sees either
    /// the full old state or an empty ledger, never a mixture.
    pub fn reset(&self) {
        {
            let mut inner = self.inner.write();
            inner.visits.clear();
            inner.obstacles.clear();
        }
        if let Err(e) = self.store.lock().clear() {
            warn!("Ledger store clear failed: {}", e);
        }
    }

    /// Number of distinct visited cells.
    pub fn visited_cells(&self) -> usize {
        self.inner.read().visits.len()
    }

    /// Number of distinct obstacle cells.
    pub fn obstacle_cells(&self) -> usize {
        self.inner.read().obstacles.len()
    }

    /// Consistent dump of visits and obstacles (one read lock, no tearing
    /// between the two tables).
    pub fn snapshot(&self) -> MapSnapshot {
        let inner = self.inner.read();
        MapSnapshot {
            visited: inner
                .visits
                .iter()
                .map(|(c, r)| (c.x, c.y, r.visit_count))
                .collect(),
            obstacles: inner
                .obstacles
                .iter()
                .map(|(c, r)| (c.x, c.y, r.confidence))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ledger() -> GridLedger {
        GridLedger::in_memory(GridConfig::default())
    }

    #[test]
    fn test_visit_count_starts_at_zero() {
        let ledger = test_ledger();
        assert_eq!(ledger.visit_count(GridCoord::new(10, 10)), 0);
    }

    #[test]
    fn test_n_visits_yield_count_n() {
        let ledger = test_ledger();
        let cell = GridCoord::new(7, 3);
        for expected in 1..=5 {
            ledger.record_visit(cell, false, 100.0);
            assert_eq!(ledger.visit_count(cell), expected);
        }
    }

    #[test]
    fn test_min_distance_kept() {
        let ledger = test_ledger();
        let cell = GridCoord::new(1, 1);
        ledger.record_visit(cell, false, 120.0);
        ledger.record_visit(cell, false, 80.0);
        ledger.record_visit(cell, false, 200.0);

        let inner = ledger.inner.read();
        let record = inner.visits.get(&cell).unwrap();
        assert_eq!(record.min_distance_cm, 80.0);
    }

    #[test]
    fn test_infinite_distance_maps_to_sentinel() {
        let ledger = test_ledger();
        let cell = GridCoord::new(2, 2);
        ledger.record_visit(cell, false, f32::INFINITY);

        let inner = ledger.inner.read();
        assert_eq!(
            inner.visits.get(&cell).unwrap().min_distance_cm,
            UNMEASURED_DISTANCE_CM
        );
    }

    #[test]
    fn test_overvisited_boundary() {
        // Default threshold is 3: count 2 is fine, count 3 trips it.
        let ledger = test_ledger();
        let cell = GridCoord::new(5, 5);
        ledger.record_visit(cell, false, 100.0);
        ledger.record_visit(cell, false, 100.0);
        assert!(!ledger.is_overvisited(cell));
        ledger.record_visit(cell, false, 100.0);
        assert!(ledger.is_overvisited(cell));
    }

    #[test]
    fn test_obstacle_latest_confidence_wins() {
        let ledger = test_ledger();
        let cell = GridCoord::new(4, 4);
        ledger.record_obstacle(cell, 0.5);
        ledger.record_obstacle(cell, 0.9);

        let nearby = ledger.nearby_obstacles(cell, 0);
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].1, 0.9);
    }

    #[test]
    fn test_nearby_obstacles_chebyshev() {
        let ledger = test_ledger();
        ledger.record_obstacle(GridCoord::new(10, 10), 1.0);
        ledger.record_obstacle(GridCoord::new(12, 8), 1.0); // Chebyshev 2
        ledger.record_obstacle(GridCoord::new(14, 10), 1.0); // Chebyshev 4

        let center = GridCoord::new(10, 10);
        assert_eq!(ledger.nearby_obstacles(center, 1).len(), 1);
        assert_eq!(ledger.nearby_obstacles(center, 2).len(), 2);
        assert_eq!(ledger.nearby_obstacles(center, 4).len(), 3);
    }

    #[test]
    fn test_least_visited_first_candidate_wins_ties() {
        let ledger = test_ledger();
        let cell = GridCoord::new(50, 50);
        // All neighbors unvisited: first listed heading must win.
        let best = ledger.least_visited_neighbor(cell, &[0.0, 90.0, 180.0, 270.0]);
        assert_eq!(best, Some(0.0));
    }

    #[test]
    fn test_least_visited_prefers_lower_count() {
        let ledger = test_ledger();
        let cell = GridCoord::new(50, 50);
        // East and north neighbors visited; west untouched.
        ledger.record_visit(GridCoord::new(51, 50), false, 100.0);
        ledger.record_visit(GridCoord::new(50, 51), false, 100.0);

        let best = ledger.least_visited_neighbor(cell, &[0.0, 90.0, 180.0, 270.0]);
        assert_eq!(best, Some(180.0));
    }

    #[test]
    fn test_least_visited_empty_candidates() {
        let ledger = test_ledger();
        assert_eq!(ledger.least_visited_neighbor(GridCoord::new(1, 1), &[]), None);
    }

    #[test]
    fn test_reset_clears_everything() {
        let ledger = test_ledger();
        let a = GridCoord::new(3, 3);
        let b = GridCoord::new(6, 6);
        ledger.record_visit(a, false, 100.0);
        ledger.record_visit(b, false, 100.0);
        ledger.record_obstacle(b, 0.8);

        ledger.reset();

        assert_eq!(ledger.visit_count(a), 0);
        assert_eq!(ledger.visit_count(b), 0);
        assert_eq!(ledger.visited_cells(), 0);
        assert_eq!(ledger.obstacle_cells(), 0);
    }

    #[test]
    fn test_out_of_bounds_cells_clamp() {
        let ledger = test_ledger();
        ledger.record_visit(GridCoord::new(-5, 300), false, 100.0);
        assert_eq!(ledger.visit_count(GridCoord::new(0, 99)), 1);
    }

    #[test]
    fn test_journal_backed_resume() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let grid = GridConfig::default();
        let cell = GridCoord::new(9, 9);

        {
            let ledger = GridLedger::open(grid.clone(), &path).unwrap();
            ledger.record_visit(cell, false, 55.0);
            ledger.record_visit(cell, true, 44.0);
            ledger.record_obstacle(GridCoord::new(9, 10), 0.8);
        }

        let ledger = GridLedger::open(grid, &path).unwrap();
        assert_eq!(ledger.visit_count(cell), 2);
        assert_eq!(ledger.obstacle_cells(), 1);

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.visited.len(), 1);
        assert_eq!(snapshot.visited[0], (9, 9, 2));
    }
}
