//! Cross-screen transfer slot.
//!
//! A single-slot, overwrite-on-write cache that hands in-flight timer state
//! across the settings detour: the workout screen writes on departure, the
//! restoration path consumes on return. At most one record is outstanding;
//! the last write wins. This is an explicitly passed handle owned by the
//! navigator, not process-global state.

use std::sync::{Arc, Mutex};

/// Snapshot of in-flight timer state taken before navigating away.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRecord {
    pub interval_index: usize,
    pub remaining_secs: u32,
    pub was_running: bool,
    pub program: String,
}

#[derive(Debug, Default)]
struct SlotInner {
    record: Option<TransferRecord>,
    /// Last record ever consumed, retained for diagnostics only.
    last: Option<TransferRecord>,
}

/// Cloneable handle to the single shared slot.
#[derive(Debug, Clone, Default)]
pub struct TransferSlot {
    inner: Arc<Mutex<SlotInner>>,
}

impl TransferSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite unconditionally. Any previous unconsumed record is lost.
    pub fn set(&self, record: TransferRecord) {
        log::debug!(
            "transfer slot set: interval={} remaining={} running={} program={}",
            record.interval_index,
            record.remaining_secs,
            record.was_running,
            record.program
        );
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.record = Some(record);
    }

    pub fn has_record(&self) -> bool {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.record.is_some()
    }

    /// Take the record out. A second consume before a new `set` returns None.
    pub fn consume(&self) -> Option<TransferRecord> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let record = inner.record.take();
        if let Some(ref r) = record {
            inner.last = Some(r.clone());
        }
        record
    }

    /// The most recently consumed record, for diagnostics.
    pub fn last_record(&self) -> Option<TransferRecord> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.last.clone()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.record = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(interval: usize) -> TransferRecord {
        TransferRecord {
            interval_index: interval,
            remaining_secs: 42,
            was_running: true,
            program: "Walk to Run".into(),
        }
    }

    #[test]
    fn consume_clears_the_slot() {
        let slot = TransferSlot::new();
        slot.set(record(2));
        assert!(slot.has_record());

        let taken = slot.consume().unwrap();
        assert_eq!(taken.interval_index, 2);
        assert!(!slot.has_record());
    }

    #[test]
    fn second_consume_is_a_noop() {
        let slot = TransferSlot::new();
        slot.set(record(1));
        assert!(slot.consume().is_some());
        assert!(slot.consume().is_none());
    }

    #[test]
    fn last_write_wins() {
        let slot = TransferSlot::new();
        slot.set(record(1));
        slot.set(record(7));
        assert_eq!(slot.consume().unwrap().interval_index, 7);
    }

    #[test]
    fn consumed_record_retained_for_diagnostics() {
        let slot = TransferSlot::new();
        slot.set(record(3));
        slot.consume();
        assert_eq!(slot.last_record().unwrap().interval_index, 3);
        assert!(!slot.has_record());
    }

    #[test]
    fn clear_drops_unconsumed_record() {
        let slot = TransferSlot::new();
        slot.set(record(1));
        slot.clear();
        assert!(slot.consume().is_none());
    }
}
