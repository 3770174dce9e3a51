//! Persisted resume position with throttled, coalesced writes.
//!
//! `write` stores the latest value in a shared cell and guarantees at most
//! one disk commit per throttle interval; the most recent value always wins.
//! `read` returns the last committed value synchronously. `force_flush`
//! commits any pending value immediately and is called at process
//! suspension. A failed commit is logged and retried on the next cycle.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use super::Database;

const POSITION_KEY: &str = "workout_position";
const DISCLAIMER_KEY: &str = "disclaimer_accepted";

/// Default throttle between disk commits.
pub const WRITE_THROTTLE: Duration = Duration::from_secs(2);

/// The resume position: (program, week, session) plus the completed flag.
///
/// `program == None` means "no resume point"; clearing is a write of that
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkoutPosition {
    pub program: Option<String>,
    #[serde(default)]
    pub week_index: usize,
    #[serde(default)]
    pub session_index: usize,
    #[serde(default)]
    pub completed: bool,
}

impl WorkoutPosition {
    pub fn new(program: &str, week_index: usize, session_index: usize, completed: bool) -> Self {
        Self {
            program: Some(program.to_string()),
            week_index,
            session_index,
            completed,
        }
    }

    /// The absent-program value used to clear the store.
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.program.is_none()
    }
}

/// Throttled writer over the kv table.
///
/// Cloneable handle; all clones share the same pending cell and drain task.
#[derive(Clone)]
pub struct PositionStore {
    db: Arc<Mutex<Database>>,
    latest: Arc<Mutex<WorkoutPosition>>,
    pending: Arc<AtomicBool>,
    drain: Arc<Mutex<Option<JoinHandle<()>>>>,
    throttle: Duration,
}

impl PositionStore {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self::with_throttle(db, WRITE_THROTTLE)
    }

    /// Store with an explicit throttle interval (tests use milliseconds).
    pub fn with_throttle(db: Arc<Mutex<Database>>, throttle: Duration) -> Self {
        Self {
            db,
            latest: Arc::new(Mutex::new(WorkoutPosition::cleared())),
            pending: Arc::new(AtomicBool::new(false)),
            drain: Arc::new(Mutex::new(None)),
            throttle,
        }
    }

    /// Queue a write. Multiple calls within the throttle window collapse to
    /// one commit carrying the last value. Must be called from within a
    /// tokio runtime.
    pub fn write(&self, position: WorkoutPosition) {
        log::debug!(
            "position write queued: program={:?} week={} session={} completed={}",
            position.program,
            position.week_index,
            position.session_index,
            position.completed
        );
        *self.latest.lock().unwrap_or_else(|e| e.into_inner()) = position;
        self.pending.store(true, Ordering::SeqCst);

        let mut drain = self.drain.lock().unwrap_or_else(|e| e.into_inner());
        let alive = drain.as_ref().map(|h| !h.is_finished()).unwrap_or(false);
        if !alive {
            let store = self.clone();
            *drain = Some(tokio::spawn(async move {
                while store.pending.swap(false, Ordering::SeqCst) {
                    store.commit();
                    tokio::time::sleep(store.throttle).await;
                }
            }));
        }
    }

    /// Bypass the throttle entirely: set the value and commit now.
    /// Used by single-shot callers (the CLI) that have no runtime to drain.
    pub fn write_now(&self, position: WorkoutPosition) {
        *self.latest.lock().unwrap_or_else(|e| e.into_inner()) = position;
        self.pending.store(false, Ordering::SeqCst);
        self.commit();
    }

    /// Remove the resume point immediately, discarding any queued write so a
    /// stale pending value cannot resurrect it.
    pub fn clear(&self) {
        self.write_now(WorkoutPosition::cleared());
    }

    /// Commit any pending value immediately. Called at app suspension.
    pub fn force_flush(&self) {
        if self.pending.swap(false, Ordering::SeqCst) {
            self.commit();
        }
    }

    /// Last committed value, read synchronously. Never blocks on a pending
    /// write; callers must not assume read-after-write consistency here.
    pub fn read(&self) -> WorkoutPosition {
        let db = self.db.lock().unwrap_or_else(|e| e.into_inner());
        match db.kv_get(POSITION_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("stored position unreadable, treating as empty: {e}");
                WorkoutPosition::cleared()
            }),
            Ok(None) => WorkoutPosition::cleared(),
            Err(e) => {
                log::warn!("position read failed, treating as empty: {e}");
                WorkoutPosition::cleared()
            }
        }
    }

    pub fn disclaimer_accepted(&self) -> bool {
        let db = self.db.lock().unwrap_or_else(|e| e.into_inner());
        matches!(db.kv_get(DISCLAIMER_KEY), Ok(Some(v)) if v == "true")
    }

    /// Immediate, unthrottled. Written once when the user accepts.
    pub fn set_disclaimer_accepted(&self) {
        let db = self.db.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = db.kv_set(DISCLAIMER_KEY, "true") {
            log::warn!("failed to record disclaimer acceptance: {e}");
        }
    }

    fn commit(&self) {
        let position = self
            .latest
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let db = self.db.lock().unwrap_or_else(|e| e.into_inner());
        let result = if position.is_empty() {
            db.kv_delete(POSITION_KEY)
        } else {
            match serde_json::to_string(&position) {
                Ok(json) => db.kv_set(POSITION_KEY, &json),
                Err(e) => {
                    log::warn!("position serialization failed: {e}");
                    return;
                }
            }
        };
        if let Err(e) = result {
            // Best effort: retried on the next drain cycle.
            log::warn!("position commit failed, will retry: {e}");
            self.pending.store(true, Ordering::SeqCst);
        }
    }
}
