//! Integration tests for the workout flow.
//!
//! Drives the navigator, controller, engine and position store together the
//! way the application does, with millisecond timing so real sessions finish
//! quickly.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use hoofin_core::storage::{AppConfig, Database, PositionStore};
use hoofin_core::{
    Interval, Navigator, NullCue, Program, ProgramLibrary, Screen, Session, Week,
    WorkoutController,
};

fn session(intervals: &[(&str, f64)]) -> Session {
    Session {
        intervals: intervals
            .iter()
            .map(|(kind, duration)| Interval {
                kind: (*kind).to_string(),
                duration: *duration,
            })
            .collect(),
    }
}

/// Two weeks of two sessions each; first session is 3 seconds of wall time.
fn tiny_program() -> Program {
    Program {
        name: "Walk to Run".into(),
        description: "integration plan".into(),
        weeks: vec![
            Week {
                sessions: vec![
                    session(&[("Walk", 2.0 / 60.0), ("Jog", 1.0 / 60.0)]),
                    session(&[("Walk", 1.0)]),
                ],
            },
            Week {
                sessions: vec![
                    session(&[("Jog", 5.0 / 60.0)]),
                    session(&[("Walk", 2.0 / 60.0)]),
                ],
            },
        ],
    }
}

fn fixture() -> (ProgramLibrary, PositionStore, WorkoutController) {
    let library = ProgramLibrary::new("/nonexistent");
    library.insert(tiny_program());
    let db = Arc::new(Mutex::new(Database::open_memory().unwrap()));
    let store = PositionStore::with_throttle(db, Duration::from_millis(5));
    let controller = WorkoutController::with_timing(
        store.clone(),
        AppConfig::default().into_shared(),
        Arc::new(NullCue),
        Duration::from_millis(10),
        Duration::from_millis(20),
    );
    (library, store, controller)
}

#[tokio::test]
async fn test_full_session_workflow() {
    let (library, store, controller) = fixture();

    // First run: disclaimer, then program selection, then the workout.
    let mut nav = Navigator::new(&store);
    assert_eq!(nav.screen(), Screen::Disclaimer);
    nav.accept_disclaimer(&store);
    nav.select_program("Walk to Run");
    nav.enter_workout(&library, &store, &controller)
        .await
        .unwrap();

    controller.toggle_start_pause().await;
    tokio::time::sleep(Duration::from_millis(120)).await;

    let completed = controller.with_engine(|e| e.completed()).await.unwrap();
    assert!(completed);

    // Completion was recorded against the right session.
    tokio::time::sleep(Duration::from_millis(20)).await;
    let position = store.read();
    assert_eq!(position.program.as_deref(), Some("Walk to Run"));
    assert_eq!((position.week_index, position.session_index), (0, 0));
    assert!(position.completed);

    // A later visit picks up at the following session.
    let mut nav = Navigator::new(&store);
    nav.select_program("Walk to Run");
    nav.enter_workout(&library, &store, &controller)
        .await
        .unwrap();
    let (week, session) = controller
        .with_engine(|e| (e.week_index(), e.session_index()))
        .await
        .unwrap();
    assert_eq!((week, session), (0, 1));

    controller.shutdown().await;
}

#[tokio::test]
async fn test_settings_detour_workflow() {
    let (library, store, controller) = fixture();
    store.set_disclaimer_accepted();

    let mut nav = Navigator::new(&store);
    nav.select_program("Walk to Run");
    nav.enter_workout(&library, &store, &controller)
        .await
        .unwrap();

    // Put the timer mid-way through the minute-long second session.
    assert!(controller.skip_session(&tiny_program()).await);
    controller.toggle_start_pause().await;
    tokio::time::sleep(Duration::from_millis(35)).await;

    nav.open_settings(&controller).await;
    assert_eq!(nav.screen(), Screen::Settings);
    let paused = controller.with_engine(|e| e.running()).await.unwrap();
    assert!(!paused);

    // The departure flush makes the position readable immediately.
    let position = store.read();
    assert_eq!((position.week_index, position.session_index), (0, 1));

    nav.back_from_settings();
    nav.enter_workout(&library, &store, &controller)
        .await
        .unwrap();

    // Restored into the same session with time already elapsed, and the
    // auto-resume brings it back to running.
    let (week, session, remaining) = controller
        .with_engine(|e| (e.week_index(), e.session_index(), e.remaining_secs()))
        .await
        .unwrap();
    assert_eq!((week, session), (0, 1));
    assert!(remaining > 0 && remaining < 60);

    tokio::time::sleep(Duration::from_millis(40)).await;
    let running = controller.with_engine(|e| e.running()).await.unwrap();
    assert!(running);

    controller.shutdown().await;
}

#[tokio::test]
async fn test_rapid_toggles_coalesce_to_one_stored_value() {
    let (library, store, controller) = fixture();
    store.set_disclaimer_accepted();

    let mut nav = Navigator::new(&store);
    nav.select_program("Walk to Run");
    nav.enter_workout(&library, &store, &controller)
        .await
        .unwrap();

    // Each pause enqueues a save; they land within one throttle window.
    for _ in 0..5 {
        controller.toggle_start_pause().await;
        controller.toggle_start_pause().await;
    }
    tokio::time::sleep(Duration::from_millis(30)).await;

    let position = store.read();
    assert_eq!(position.program.as_deref(), Some("Walk to Run"));
    assert_eq!((position.week_index, position.session_index), (0, 0));
    assert!(!position.completed);

    controller.shutdown().await;
}

#[tokio::test]
async fn test_exhausted_program_starts_over() {
    let (library, store, controller) = fixture();
    store.set_disclaimer_accepted();
    store.write_now(hoofin_core::WorkoutPosition::new("Walk to Run", 1, 1, true));

    let mut nav = Navigator::new(&store);
    nav.select_program("Walk to Run");
    nav.enter_workout(&library, &store, &controller)
        .await
        .unwrap();

    let (week, session) = controller
        .with_engine(|e| (e.week_index(), e.session_index()))
        .await
        .unwrap();
    assert_eq!((week, session), (0, 0));
    assert!(store.read().is_empty());

    controller.shutdown().await;
}
