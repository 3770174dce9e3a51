//! Workout engine implementation.
//!
//! The engine is a synchronous, single-owner state machine. It does not use
//! internal threads or timers; the caller drives it by invoking `tick()`
//! once per second while running (see [`super::controller`] for the async
//! owner that does this).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused -> Completed
//!         (restart: Running/Paused -> Idle at interval 0)
//!         (session/week skip: any -> Idle at the new session)
//! ```
//!
//! Completed is terminal until a fresh `new`/`restore`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::program::{Interval, Program, Session};
use crate::storage::WorkoutPosition;

/// Core workout state machine.
///
/// Serializable so single-shot callers (the CLI) can round-trip it through
/// the kv store between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutEngine {
    session: Session,
    program_name: String,
    week_index: usize,
    session_index: usize,
    interval_index: usize,
    /// Counts down within the current interval; never exceeds the interval's
    /// ceiling duration and is recomputed (not decremented) whenever the
    /// active interval changes.
    remaining_secs: u32,
    total_secs: u32,
    running: bool,
    paused: bool,
    completed: bool,
    /// Always elapsed/total, recomputed from (interval_index, remaining_secs).
    progress: f64,
    /// Snapshot taken on pause, consumed on the next start.
    paused_remaining_secs: Option<u32>,
    /// Gates ordinary position saves: a session the user never touched must
    /// not overwrite the stored position.
    has_interacted: bool,
}

impl WorkoutEngine {
    /// Initialize a fresh session. An out-of-range `start_interval_index`
    /// falls back to interval 0; a session with zero intervals is a caller
    /// precondition violation.
    pub fn new(
        session: Session,
        program_name: &str,
        week_index: usize,
        session_index: usize,
        start_interval_index: usize,
    ) -> Self {
        let interval_index = if start_interval_index < session.intervals.len() {
            start_interval_index
        } else {
            0
        };
        let remaining_secs = session
            .intervals
            .get(interval_index)
            .map(Interval::duration_secs)
            .unwrap_or(0);
        let total_secs = session.total_secs();
        let mut engine = Self {
            session,
            program_name: program_name.trim().to_string(),
            week_index,
            session_index,
            interval_index,
            remaining_secs,
            total_secs,
            running: false,
            paused: false,
            completed: false,
            progress: 0.0,
            paused_remaining_secs: None,
            has_interacted: false,
        };
        engine.update_progress();
        engine
    }

    /// Seed state from values carried across the settings detour.
    ///
    /// Lands paused; the returned flag tells the caller to schedule the
    /// delayed auto-resume (true only if the stored state was running and
    /// the stored interval index is valid).
    pub fn restore(
        session: Session,
        program_name: &str,
        week_index: usize,
        session_index: usize,
        stored_interval_index: usize,
        stored_remaining_secs: u32,
        stored_was_running: bool,
    ) -> (Self, bool) {
        let mut engine = Self::new(session, program_name, week_index, session_index, 0);
        engine.paused = true;
        engine.has_interacted = true;

        if stored_interval_index >= engine.session.intervals.len() {
            log::warn!(
                "invalid interval index {} for restoration, staying at interval 0",
                stored_interval_index
            );
            return (engine, false);
        }

        engine.interval_index = stored_interval_index;
        let cap = engine.session.intervals[stored_interval_index].duration_secs();
        engine.remaining_secs = stored_remaining_secs.min(cap);
        engine.update_progress();
        (engine, stored_was_running)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn interval_index(&self) -> usize {
        self.interval_index
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// 0.0 ..= 1.0 progress across the session.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    pub fn week_index(&self) -> usize {
        self.week_index
    }

    pub fn session_index(&self) -> usize {
        self.session_index
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_interval(&self) -> Option<&Interval> {
        self.session.intervals.get(self.interval_index)
    }

    /// Seconds left across the whole session.
    pub fn total_remaining_secs(&self) -> u32 {
        let elapsed = self.session.secs_before(self.interval_index)
            + self
                .current_interval()
                .map(|i| i.duration_secs().saturating_sub(self.remaining_secs))
                .unwrap_or(0);
        self.total_secs.saturating_sub(elapsed)
    }

    /// The resume-position tuple for persistence.
    pub fn position(&self) -> WorkoutPosition {
        WorkoutPosition {
            program: Some(self.program_name.clone()),
            week_index: self.week_index,
            session_index: self.session_index,
            completed: self.completed,
        }
    }

    /// Ordinary saves are gated on a prior user interaction and a non-empty
    /// program name; completion saves bypass the interaction gate.
    pub fn should_persist(&self) -> bool {
        self.has_interacted && !self.program_name.is_empty()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            running: self.running,
            paused: self.paused,
            completed: self.completed,
            interval_index: self.interval_index,
            interval_kind: self
                .current_interval()
                .map(|i| i.kind.clone())
                .unwrap_or_default(),
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            progress: self.progress,
            program: self.program_name.clone(),
            week_index: self.week_index,
            session_index: self.session_index,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start if stopped, pause if running. None once completed.
    pub fn toggle_start_pause(&mut self) -> Option<Event> {
        if self.completed {
            return None;
        }
        self.has_interacted = true;
        if self.running {
            self.paused = true;
            self.running = false;
            self.paused_remaining_secs = Some(self.remaining_secs);
            Some(Event::WorkoutPaused {
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            })
        } else {
            if let Some(secs) = self.paused_remaining_secs.take() {
                self.remaining_secs = secs;
            }
            self.paused = false;
            self.running = true;
            Some(Event::WorkoutStarted {
                interval_index: self.interval_index,
                interval_kind: self
                    .current_interval()
                    .map(|i| i.kind.clone())
                    .unwrap_or_default(),
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            })
        }
    }

    /// One second elapsed. Decrements, advances across interval boundaries,
    /// or completes the session; no-op unless running.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            self.update_progress();
            if self.remaining_secs > 0 {
                return None;
            }
        }
        self.advance_or_complete()
    }

    /// User-initiated advance. Pauses on the new interval, or
    /// force-completes immediately from the last interval.
    pub fn skip_to_next_interval(&mut self) -> Event {
        self.has_interacted = true;
        if self.interval_index + 1 < self.session.intervals.len() {
            self.interval_index += 1;
            self.remaining_secs = self.session.intervals[self.interval_index].duration_secs();
            self.paused_remaining_secs = None;
            self.running = false;
            self.paused = true;
            self.update_progress();
            Event::IntervalAdvanced {
                interval_index: self.interval_index,
                interval_kind: self.session.intervals[self.interval_index].kind.clone(),
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            }
        } else {
            self.remaining_secs = 0;
            self.complete()
        }
    }

    /// Re-anchor to the next session in the current week. None at the end
    /// of the week; state is untouched in that case.
    pub fn skip_to_next_session(&mut self, program: &Program) -> Option<Event> {
        self.has_interacted = true;
        let week = program.weeks.get(self.week_index)?;
        let next = self.session_index + 1;
        let session = week.sessions.get(next)?.clone();
        self.anchor_to(session, self.week_index, next);
        Some(Event::PositionChanged {
            week_index: self.week_index,
            session_index: self.session_index,
            at: Utc::now(),
        })
    }

    /// Re-anchor to the first session of the next week. None at the end of
    /// the program.
    pub fn skip_to_next_week(&mut self, program: &Program) -> Option<Event> {
        self.has_interacted = true;
        let next_week = self.week_index + 1;
        let session = program
            .weeks
            .get(next_week)
            .and_then(|w| w.sessions.first())?
            .clone();
        self.anchor_to(session, next_week, 0);
        Some(Event::PositionChanged {
            week_index: self.week_index,
            session_index: self.session_index,
            at: Utc::now(),
        })
    }

    /// Back to interval 0 with its full duration. Only valid while running
    /// or paused.
    pub fn restart(&mut self) -> Option<Event> {
        if !self.running && !self.paused {
            return None;
        }
        self.has_interacted = true;
        self.running = false;
        self.paused = false;
        self.interval_index = 0;
        self.paused_remaining_secs = None;
        self.remaining_secs = self
            .session
            .intervals
            .first()
            .map(Interval::duration_secs)
            .unwrap_or(0);
        self.update_progress();
        Some(Event::WorkoutRestarted {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Force the completed state; callers persist the returned event
    /// unconditionally.
    pub fn mark_completed(&mut self) -> Event {
        self.complete()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance_or_complete(&mut self) -> Option<Event> {
        if self.interval_index + 1 < self.session.intervals.len() {
            self.interval_index += 1;
            self.remaining_secs = self.session.intervals[self.interval_index].duration_secs();
            self.paused_remaining_secs = None;
            self.update_progress();
            Some(Event::IntervalAdvanced {
                interval_index: self.interval_index,
                interval_kind: self.session.intervals[self.interval_index].kind.clone(),
                remaining_secs: self.remaining_secs,
                at: Utc::now(),
            })
        } else {
            Some(self.complete())
        }
    }

    fn complete(&mut self) -> Event {
        self.running = false;
        self.paused = false;
        self.progress = 1.0;
        self.paused_remaining_secs = None;
        self.completed = true;
        Event::SessionCompleted {
            program: self.program_name.clone(),
            week_index: self.week_index,
            session_index: self.session_index,
            at: Utc::now(),
        }
    }

    fn anchor_to(&mut self, session: Session, week_index: usize, session_index: usize) {
        self.total_secs = session.total_secs();
        self.remaining_secs = session
            .intervals
            .first()
            .map(Interval::duration_secs)
            .unwrap_or(0);
        self.session = session;
        self.week_index = week_index;
        self.session_index = session_index;
        self.interval_index = 0;
        self.running = false;
        self.paused = false;
        self.completed = false;
        self.progress = 0.0;
        self.paused_remaining_secs = None;
    }

    fn update_progress(&mut self) {
        if self.total_secs == 0 {
            return;
        }
        let done = self.session.secs_before(self.interval_index);
        let current = self
            .current_interval()
            .map(Interval::duration_secs)
            .unwrap_or(0);
        let elapsed = done + current.saturating_sub(self.remaining_secs);
        self.progress = (f64::from(elapsed) / f64::from(self.total_secs)).clamp(0.0, 1.0);
    }
}
