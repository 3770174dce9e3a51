use clap::Subcommand;
use hoofin_core::nav::resolve_start_position;
use hoofin_core::storage::{Database, PositionStore};
use hoofin_core::{ProgramError, ProgramLibrary, WorkoutEngine};
use std::sync::{Arc, Mutex};

const ENGINE_KEY: &str = "workout_engine";

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// Begin (or resume) a session and start the countdown
    Start {
        /// Program name; defaults to the program of the saved position
        #[arg(long)]
        program: Option<String>,
        /// Week index to start at (defaults to the saved position)
        #[arg(long)]
        week: Option<usize>,
        /// Session index to start at (defaults to the saved position)
        #[arg(long)]
        session: Option<usize>,
    },
    /// Pause the countdown
    Pause,
    /// Print current workout state as JSON
    Status,
    /// Advance the clock by N seconds
    Tick {
        /// Seconds to advance
        #[arg(default_value = "1")]
        secs: u32,
    },
    /// Skip to the next interval (lands paused)
    Skip,
    /// Skip to the next session in the current week
    SkipSession,
    /// Skip to the first session of the next week
    SkipWeek,
    /// Restart the current session from the first interval
    Restart,
    /// Mark the current session completed
    Complete,
}

struct Context {
    db: Arc<Mutex<Database>>,
    store: PositionStore,
    library: ProgramLibrary,
}

impl Context {
    fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Mutex::new(Database::open()?));
        let store = PositionStore::new(db.clone());
        let library = ProgramLibrary::open()?;
        Ok(Self { db, store, library })
    }

    fn load_engine(&self) -> Option<WorkoutEngine> {
        let db = self.db.lock().unwrap_or_else(|e| e.into_inner());
        let json = db.kv_get(ENGINE_KEY).ok()??;
        serde_json::from_str(&json).ok()
    }

    fn save_engine(&self, engine: &WorkoutEngine) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string(engine)?;
        let db = self.db.lock().unwrap_or_else(|e| e.into_inner());
        db.kv_set(ENGINE_KEY, &json)?;
        Ok(())
    }

    /// Save the engine snapshot, and the resume position when the engine
    /// allows it. Completion always records the position.
    fn persist(&self, engine: &WorkoutEngine) -> Result<(), Box<dyn std::error::Error>> {
        self.save_engine(engine)?;
        if engine.completed() || engine.should_persist() {
            self.store.write_now(engine.position());
        }
        Ok(())
    }

    fn require_engine(&self) -> Result<WorkoutEngine, Box<dyn std::error::Error>> {
        self.load_engine()
            .ok_or_else(|| "no active workout; run `hoofin-cli workout start`".into())
    }
}

fn print_snapshot(engine: &WorkoutEngine) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    Ok(())
}

pub fn run(action: WorkoutAction) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open()?;

    match action {
        WorkoutAction::Start {
            program,
            week,
            session,
        } => {
            let stored = ctx.store.read();
            let name = program
                .or(stored.program)
                .ok_or("no program selected; pass --program")?;
            let program = ctx
                .library
                .lookup(&name)
                .ok_or(ProgramError::NotFound(name))?;
            program.validate()?;

            // Continue an in-flight session of the same program unless the
            // caller pinned an explicit position.
            let mut engine = match ctx.load_engine() {
                Some(e)
                    if e.program_name() == program.name
                        && !e.completed()
                        && week.is_none()
                        && session.is_none() =>
                {
                    e
                }
                _ => {
                    let (week_index, session_index) = match (week, session) {
                        (Some(w), Some(s)) => (w, s),
                        _ => resolve_start_position(&program, &ctx.store),
                    };
                    let session = program
                        .session_at(week_index, session_index)
                        .ok_or(format!(
                            "program '{}' has no session {session_index} in week {week_index}",
                            program.name
                        ))?
                        .clone();
                    WorkoutEngine::new(session, &program.name, week_index, session_index, 0)
                }
            };

            if !engine.running() {
                engine.toggle_start_pause();
            }
            ctx.persist(&engine)?;
            print_snapshot(&engine)?;
        }
        WorkoutAction::Pause => {
            let mut engine = ctx.require_engine()?;
            if engine.running() {
                engine.toggle_start_pause();
            }
            ctx.persist(&engine)?;
            print_snapshot(&engine)?;
        }
        WorkoutAction::Status => match ctx.load_engine() {
            Some(engine) => print_snapshot(&engine)?,
            None => println!("no active workout"),
        },
        WorkoutAction::Tick { secs } => {
            let mut engine = ctx.require_engine()?;
            for _ in 0..secs {
                if let Some(event) = engine.tick() {
                    println!("{}", serde_json::to_string_pretty(&event)?);
                }
                if engine.completed() {
                    break;
                }
            }
            ctx.persist(&engine)?;
            print_snapshot(&engine)?;
        }
        WorkoutAction::Skip => {
            let mut engine = ctx.require_engine()?;
            let event = engine.skip_to_next_interval();
            println!("{}", serde_json::to_string_pretty(&event)?);
            ctx.persist(&engine)?;
        }
        WorkoutAction::SkipSession => {
            let mut engine = ctx.require_engine()?;
            let program = ctx
                .library
                .lookup(engine.program_name())
                .ok_or(ProgramError::NotFound(engine.program_name().to_string()))?;
            match engine.skip_to_next_session(&program) {
                Some(event) => {
                    println!("{}", serde_json::to_string_pretty(&event)?);
                    ctx.persist(&engine)?;
                }
                None => println!("already at the last session of the week"),
            }
        }
        WorkoutAction::SkipWeek => {
            let mut engine = ctx.require_engine()?;
            let program = ctx
                .library
                .lookup(engine.program_name())
                .ok_or(ProgramError::NotFound(engine.program_name().to_string()))?;
            match engine.skip_to_next_week(&program) {
                Some(event) => {
                    println!("{}", serde_json::to_string_pretty(&event)?);
                    ctx.persist(&engine)?;
                }
                None => println!("already in the last week of the program"),
            }
        }
        WorkoutAction::Restart => {
            let mut engine = ctx.require_engine()?;
            match engine.restart() {
                Some(event) => {
                    println!("{}", serde_json::to_string_pretty(&event)?);
                    ctx.persist(&engine)?;
                }
                None => println!("nothing to restart"),
            }
        }
        WorkoutAction::Complete => {
            let mut engine = ctx.require_engine()?;
            let event = engine.mark_completed();
            println!("{}", serde_json::to_string_pretty(&event)?);
            ctx.persist(&engine)?;
        }
    }

    Ok(())
}
