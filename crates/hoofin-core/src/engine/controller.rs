//! Async owner of the workout engine.
//!
//! Runs the cooperative one-second tick loop, the delayed auto-resume after
//! a settings detour, and maps engine events to side effects (sound cue,
//! coalesced position saves). At most one tick loop is alive per controller;
//! spawning a new one aborts any predecessor, and every transition out of
//! running aborts it before returning so no stale tick fires against
//! updated state.
//!
//! In-memory mutation always happens before the persistence enqueue;
//! read-after-write consistency holds only against the engine, never
//! against the position store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::cues::SoundCue;
use crate::events::Event;
use crate::program::{Program, Session};
use crate::storage::{PositionStore, SharedConfig};
use crate::transfer::{TransferRecord, TransferSlot};

use super::WorkoutEngine;

/// Tick cadence while running.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Delay before the automatic resume after a restore. Long enough for the
/// surrounding UI to finish mounting; not a correctness requirement of the
/// engine itself.
pub const RESUME_DELAY: Duration = Duration::from_millis(800);

#[derive(Clone)]
pub struct WorkoutController {
    engine: Arc<Mutex<Option<WorkoutEngine>>>,
    store: PositionStore,
    config: SharedConfig,
    cues: Arc<dyn SoundCue>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    resume_task: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
    resume_delay: Duration,
}

impl WorkoutController {
    pub fn new(store: PositionStore, config: SharedConfig, cues: Arc<dyn SoundCue>) -> Self {
        Self::with_timing(store, config, cues, TICK_INTERVAL, RESUME_DELAY)
    }

    /// Controller with explicit tick/resume timing (tests use milliseconds).
    pub fn with_timing(
        store: PositionStore,
        config: SharedConfig,
        cues: Arc<dyn SoundCue>,
        tick_interval: Duration,
        resume_delay: Duration,
    ) -> Self {
        Self {
            engine: Arc::new(Mutex::new(None)),
            store,
            config,
            cues,
            ticker: Arc::new(Mutex::new(None)),
            resume_task: Arc::new(Mutex::new(None)),
            tick_interval,
            resume_delay,
        }
    }

    /// Fresh session. Replaces any previous engine and stops its loops.
    pub async fn initialize(
        &self,
        session: Session,
        program_name: &str,
        week_index: usize,
        session_index: usize,
        start_interval_index: usize,
    ) {
        self.cancel_ticker().await;
        self.cancel_resume().await;
        let engine = WorkoutEngine::new(
            session,
            program_name,
            week_index,
            session_index,
            start_interval_index,
        );
        *self.engine.lock().await = Some(engine);
        log::debug!("initialized workout: program='{program_name}' week={week_index} session={session_index}");
    }

    /// Seed the engine from a transfer record. Lands paused; if the record
    /// was running, schedules the delayed auto-resume equivalent to a user
    /// press.
    pub async fn restore(
        &self,
        session: Session,
        program_name: &str,
        week_index: usize,
        session_index: usize,
        record: TransferRecord,
    ) {
        self.cancel_ticker().await;
        self.cancel_resume().await;
        let (engine, auto_resume) = WorkoutEngine::restore(
            session,
            program_name,
            week_index,
            session_index,
            record.interval_index,
            record.remaining_secs,
            record.was_running,
        );
        *self.engine.lock().await = Some(engine);
        log::debug!("restored workout: interval={} remaining={} auto_resume={auto_resume}",
            record.interval_index, record.remaining_secs);

        if auto_resume {
            let ctl = self.clone();
            let delay = self.resume_delay;
            *self.resume_task.lock().await = Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                log::debug!("auto-resuming workout after restore");
                ctl.toggle_start_pause().await;
            }));
        }
    }

    /// Start or pause; starting spawns the tick loop, pausing cancels it
    /// before returning.
    pub async fn toggle_start_pause(&self) -> Option<Event> {
        let event = {
            let mut guard = self.engine.lock().await;
            guard.as_mut()?.toggle_start_pause()
        };
        match event {
            Some(Event::WorkoutStarted { .. }) => {
                self.spawn_ticker().await;
            }
            Some(Event::WorkoutPaused { .. }) => {
                self.cancel_ticker().await;
                self.persist(false).await;
            }
            _ => {}
        }
        event
    }

    /// User skip to the next interval (pauses there), or force-completion
    /// from the last interval.
    pub async fn skip_interval(&self) -> Option<Event> {
        let event = {
            let mut guard = self.engine.lock().await;
            guard.as_mut().map(|e| e.skip_to_next_interval())
        }?;
        self.cancel_ticker().await;
        match event {
            Event::IntervalAdvanced { .. } => {
                self.fire_cue();
                self.persist(false).await;
            }
            Event::SessionCompleted { .. } => {
                self.persist(true).await;
            }
            _ => {}
        }
        Some(event)
    }

    /// Re-anchor to the next session in the week. False at the boundary.
    pub async fn skip_session(&self, program: &Program) -> bool {
        let event = {
            let mut guard = self.engine.lock().await;
            guard.as_mut().and_then(|e| e.skip_to_next_session(program))
        };
        if event.is_none() {
            return false;
        }
        self.cancel_ticker().await;
        self.persist(false).await;
        true
    }

    /// Re-anchor to the first session of the next week. False at the end of
    /// the program.
    pub async fn skip_week(&self, program: &Program) -> bool {
        let event = {
            let mut guard = self.engine.lock().await;
            guard.as_mut().and_then(|e| e.skip_to_next_week(program))
        };
        if event.is_none() {
            return false;
        }
        self.cancel_ticker().await;
        self.persist(false).await;
        true
    }

    /// Back to interval 0, stopped. False if the engine was idle.
    pub async fn restart(&self) -> bool {
        let event = {
            let mut guard = self.engine.lock().await;
            guard.as_mut().and_then(|e| e.restart())
        };
        if event.is_none() {
            return false;
        }
        self.cancel_ticker().await;
        self.persist(false).await;
        true
    }

    /// Force completion; the save bypasses the interaction gate.
    pub async fn mark_completed(&self) {
        let done = {
            let mut guard = self.engine.lock().await;
            guard.as_mut().map(|e| e.mark_completed()).is_some()
        };
        if done {
            self.cancel_ticker().await;
            self.persist(true).await;
        }
    }

    /// Snapshot the live state into the transfer slot and pause, ahead of
    /// the settings detour. Flushes the position so the return path reads a
    /// consistent resume point.
    pub async fn store_for_settings(&self, slot: &TransferSlot) {
        let record = {
            let mut guard = self.engine.lock().await;
            let Some(engine) = guard.as_mut() else { return };
            let record = TransferRecord {
                interval_index: engine.interval_index(),
                remaining_secs: engine.remaining_secs(),
                was_running: engine.running(),
                program: engine.program_name().to_string(),
            };
            if engine.running() {
                engine.toggle_start_pause();
            }
            record
        };
        self.cancel_ticker().await;
        slot.set(record);
        self.persist(false).await;
        self.store.force_flush();
    }

    /// Full state snapshot event, or None before the first initialize.
    pub async fn snapshot(&self) -> Option<Event> {
        let guard = self.engine.lock().await;
        guard.as_ref().map(|e| e.snapshot())
    }

    /// Run a closure against the engine state.
    pub async fn with_engine<T>(&self, f: impl FnOnce(&WorkoutEngine) -> T) -> Option<T> {
        let guard = self.engine.lock().await;
        guard.as_ref().map(f)
    }

    /// App is being backgrounded: commit any pending position write now.
    pub fn suspend(&self) {
        self.store.force_flush();
    }

    /// App teardown: stop all loops.
    pub async fn shutdown(&self) {
        self.cancel_ticker().await;
        self.cancel_resume().await;
    }

    // ── Internal ─────────────────────────────────────────────────────

    async fn spawn_ticker(&self) {
        let mut guard = self.ticker.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        let ctl = self.clone();
        *guard = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(ctl.tick_interval);
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;

                let event = {
                    let mut guard = ctl.engine.lock().await;
                    let Some(engine) = guard.as_mut() else { break };
                    if !engine.running() {
                        break;
                    }
                    engine.tick()
                };

                match event {
                    Some(Event::IntervalAdvanced { .. }) => {
                        ctl.fire_cue();
                        ctl.persist(false).await;
                    }
                    Some(Event::SessionCompleted { .. }) => {
                        ctl.persist(true).await;
                        break;
                    }
                    _ => {}
                }
            }
        }));
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    async fn cancel_resume(&self) {
        if let Some(handle) = self.resume_task.lock().await.take() {
            handle.abort();
        }
    }

    fn fire_cue(&self) {
        let enabled = self
            .config
            .lock()
            .map(|c| c.sound.enabled)
            .unwrap_or(true);
        if enabled {
            self.cues.play_interval_change();
        }
    }

    /// Enqueue a coalesced position save. Ordinary saves honor the
    /// interaction gate; `force` is used on completion, which must always
    /// be recorded.
    async fn persist(&self, force: bool) {
        let position = {
            let guard = self.engine.lock().await;
            match guard.as_ref() {
                Some(engine) if force || engine.should_persist() => {
                    let position = engine.position();
                    // Never record a position without a program identity.
                    if position.program.as_deref().unwrap_or("").is_empty() {
                        None
                    } else {
                        Some(position)
                    }
                }
                _ => None,
            }
        };
        if let Some(position) = position {
            self.store.write(position);
        }
    }
}
