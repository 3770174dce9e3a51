use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every boundary transition in the engine produces an Event.
///
/// The engine itself never touches disk or audio; callers (the controller,
/// the CLI) consume the returned event and apply the side effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    WorkoutStarted {
        interval_index: usize,
        interval_kind: String,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    WorkoutPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// The active interval changed, either by the tick loop exhausting the
    /// previous one or by a user skip. Carries the new interval.
    IntervalAdvanced {
        interval_index: usize,
        interval_kind: String,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// The last interval finished. Terminal until re-initialize/restore.
    SessionCompleted {
        program: String,
        week_index: usize,
        session_index: usize,
        at: DateTime<Utc>,
    },
    /// Re-anchored to a new session or week via a user skip.
    PositionChanged {
        week_index: usize,
        session_index: usize,
        at: DateTime<Utc>,
    },
    WorkoutRestarted {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        running: bool,
        paused: bool,
        completed: bool,
        interval_index: usize,
        interval_kind: String,
        remaining_secs: u32,
        total_secs: u32,
        progress: f64,
        program: String,
        week_index: usize,
        session_index: usize,
        at: DateTime<Utc>,
    },
}
