//! # Hoofin Core Library
//!
//! Core business logic for Hoofin, a guided interval-workout runner that
//! walks a user through a structured training program (weeks -> sessions ->
//! timed intervals). All operations are available through this library; the
//! CLI binary is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Workout Engine**: a synchronous state machine owning interval index,
//!   remaining time and progress. Boundary transitions are reported as
//!   [`Event`]s; the caller decides what to do with them.
//! - **Workout Controller**: async owner of one engine. Runs the cooperative
//!   one-second tick loop, the delayed auto-resume after a settings detour,
//!   and maps engine events to sound cues and persistence.
//! - **Storage**: SQLite-backed position store with throttled, coalesced
//!   writes, plus TOML-based application configuration.
//! - **Navigation**: screen orchestrator threading the settings detour and
//!   the resume-position logic into the engine's initialize/restore paths.
//!
//! ## Key Components
//!
//! - [`WorkoutEngine`]: core workout state machine
//! - [`WorkoutController`]: ticking + lifecycle wrapper around the engine
//! - [`PositionStore`]: throttled resume-position persistence
//! - [`TransferSlot`]: cross-screen handoff of in-flight timer state
//! - [`Navigator`]: screen transitions and restore orchestration

pub mod cues;
pub mod engine;
pub mod error;
pub mod events;
pub mod nav;
pub mod program;
pub mod storage;
pub mod transfer;

pub use cues::{LogCue, NullCue, SoundCue};
pub use engine::{WorkoutController, WorkoutEngine};
pub use error::{CoreError, ProgramError, StorageError};
pub use events::Event;
pub use nav::{Navigator, Screen};
pub use program::{Interval, PaceDefinition, PaceGuide, Program, ProgramLibrary, Session, Week};
pub use storage::{AppConfig, Database, PositionStore, WorkoutPosition};
pub use transfer::{TransferRecord, TransferSlot};
