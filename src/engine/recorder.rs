//! In-memory movement history.

use parking_lot::Mutex;

use crate::core::types::MovementRecord;

/// Append-only log of decisions, oldest first.
///
/// Kept in memory for status queries and post-run inspection; the durable
/// map state lives in the ledger, not here.
#[derive(Debug, Default)]
pub struct MovementRecorder {
    records: Mutex<Vec<MovementRecord>>,
}

impl MovementRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: MovementRecord) {
        self.records.lock().push(record);
    }

    /// Number of recorded decisions.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Clone of the full history.
    pub fn records(&self) -> Vec<MovementRecord> {
        self.records.lock().clone()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Pose, PrimitiveAction};

    fn record(action: PrimitiveAction) -> MovementRecord {
        MovementRecord {
            timestamp_us: 1,
            action,
            reason: "test".to_string(),
            pose: Pose::default(),
            distance_cm: 999.0,
            obstacle: false,
        }
    }

    #[test]
    fn test_append_preserves_order() {
        let recorder = MovementRecorder::new();
        recorder.append(record(PrimitiveAction::MoveForward));
        recorder.append(record(PrimitiveAction::TurnLeft));

        let records = recorder.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].action, PrimitiveAction::MoveForward);
        assert_eq!(records[1].action, PrimitiveAction::TurnLeft);
    }

    #[test]
    fn test_clear_empties_history() {
        let recorder = MovementRecorder::new();
        recorder.append(record(PrimitiveAction::Stop));
        recorder.clear();
        assert!(recorder.is_empty());
    }
}
