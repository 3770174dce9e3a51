//! Screen orchestration.
//!
//! Decides which screen is visible and threads the "returning from
//! settings" signal into the engine's restore path. The transfer slot is
//! owned here and handed to the controller explicitly; there is no
//! process-global state.

use std::sync::Arc;

use crate::engine::WorkoutController;
use crate::error::{CoreError, ProgramError};
use crate::program::{Program, ProgramLibrary};
use crate::storage::PositionStore;
use crate::transfer::TransferSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    ProgramSelection,
    Disclaimer,
    Workout,
    Settings,
}

/// Screen state machine plus the detour bookkeeping flags.
pub struct Navigator {
    screen: Screen,
    /// Did we enter Settings from Workout (where does Back return to).
    came_from_workout: bool,
    /// Mid-workout detour in progress; makes the next workout entry restore
    /// instead of initialize. Consumed exactly once.
    visiting_settings: bool,
    selected_program: Option<String>,
    slot: TransferSlot,
}

impl Navigator {
    /// Starts at program selection, or at the disclaimer if it has not been
    /// accepted yet.
    pub fn new(store: &PositionStore) -> Self {
        let screen = if store.disclaimer_accepted() {
            Screen::ProgramSelection
        } else {
            Screen::Disclaimer
        };
        Self {
            screen,
            came_from_workout: false,
            visiting_settings: false,
            selected_program: None,
            slot: TransferSlot::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn slot(&self) -> &TransferSlot {
        &self.slot
    }

    pub fn selected_program(&self) -> Option<&str> {
        self.selected_program.as_deref()
    }

    pub fn accept_disclaimer(&mut self, store: &PositionStore) {
        store.set_disclaimer_accepted();
        self.screen = Screen::ProgramSelection;
    }

    /// User picked a program; the workout screen is entered next via
    /// [`Navigator::enter_workout`].
    pub fn select_program(&mut self, name: &str) {
        self.selected_program = Some(name.to_string());
        self.screen = Screen::Workout;
    }

    pub fn exit_workout(&mut self) {
        self.screen = Screen::ProgramSelection;
    }

    /// Navigate to settings. From the workout screen this snapshots the
    /// live timer into the slot and pauses first.
    pub async fn open_settings(&mut self, controller: &WorkoutController) {
        if self.screen == Screen::Workout {
            controller.store_for_settings(&self.slot).await;
            self.came_from_workout = true;
            self.visiting_settings = true;
        } else {
            self.came_from_workout = false;
            self.visiting_settings = false;
        }
        self.screen = Screen::Settings;
    }

    /// Back from settings, routed on where we came from. The
    /// `visiting_settings` flag is deliberately left set; the workout entry
    /// consumes it.
    pub fn back_from_settings(&mut self) {
        if self.came_from_workout {
            self.came_from_workout = false;
            self.screen = Screen::Workout;
        } else {
            self.screen = Screen::ProgramSelection;
        }
    }

    /// Drive the engine for the workout screen: the restore path when
    /// returning from a mid-workout settings detour, the initialize path
    /// otherwise (resolving the persisted resume position first).
    ///
    /// Returns the program so the caller can render the session.
    pub async fn enter_workout(
        &mut self,
        library: &ProgramLibrary,
        store: &PositionStore,
        controller: &WorkoutController,
    ) -> Result<Arc<Program>, CoreError> {
        let name = self
            .selected_program
            .clone()
            .ok_or_else(|| ProgramError::NotFound("<none selected>".into()))?;
        let program = library
            .lookup(&name)
            .ok_or_else(|| ProgramError::NotFound(name.clone()))?;
        program.validate()?;

        let returning = self.visiting_settings;
        self.visiting_settings = false;

        if returning {
            if let Some(record) = self.slot.consume() {
                // Week/session come from the position flushed on departure.
                let stored = store.read();
                let (week_index, session_index) =
                    if stored.program.as_deref() == Some(program.name.as_str()) {
                        clamp_position(&program, stored.week_index, stored.session_index)
                    } else {
                        (0, 0)
                    };
                let session = program
                    .session_at(week_index, session_index)
                    .cloned()
                    .expect("clamped position is always valid");
                controller
                    .restore(session, &program.name, week_index, session_index, record)
                    .await;
                self.screen = Screen::Workout;
                return Ok(program);
            }
            // Slot already consumed or never written: nothing to restore.
            log::debug!("returning from settings with no transfer record, initializing");
        }

        let (week_index, session_index) = resolve_start_position(&program, store);
        let session = program
            .session_at(week_index, session_index)
            .cloned()
            .expect("clamped position is always valid");
        controller
            .initialize(session, &program.name, week_index, session_index, 0)
            .await;
        self.screen = Screen::Workout;
        Ok(program)
    }
}

/// Resolve where a (re-)entered workout starts from the persisted position:
/// a matching in-progress position resumes in place, a matching completed
/// position advances to the following session, and an exhausted or foreign
/// position starts the program over with the store cleared.
pub fn resolve_start_position(program: &Program, store: &PositionStore) -> (usize, usize) {
    let stored = store.read();
    if stored.program.as_deref() != Some(program.name.as_str()) {
        store.clear();
        return (0, 0);
    }

    let (week_index, session_index) =
        clamp_position(program, stored.week_index, stored.session_index);
    if !stored.completed {
        return (week_index, session_index);
    }
    match program.next_session_position(week_index, session_index) {
        Some(next) => next,
        None => {
            // Program finished from the start.
            store.clear();
            (0, 0)
        }
    }
}

fn clamp_position(program: &Program, week_index: usize, session_index: usize) -> (usize, usize) {
    let week_index = if week_index < program.weeks.len() {
        week_index
    } else {
        0
    };
    let session_index = if session_index < program.weeks[week_index].sessions.len() {
        session_index
    } else {
        0
    };
    (week_index, session_index)
}
