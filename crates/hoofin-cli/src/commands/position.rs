use clap::Subcommand;
use hoofin_core::storage::{Database, PositionStore, WorkoutPosition};
use std::sync::{Arc, Mutex};

#[derive(Subcommand)]
pub enum PositionAction {
    /// Print the saved resume position as JSON
    Show,
    /// Clear the saved resume position
    Clear,
}

pub fn run(action: PositionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Arc::new(Mutex::new(Database::open()?));
    let store = PositionStore::new(db);

    match action {
        PositionAction::Show => {
            let position = store.read();
            if position.is_empty() {
                println!("no saved position");
            } else {
                println!("{}", serde_json::to_string_pretty(&position)?);
            }
        }
        PositionAction::Clear => {
            store.write_now(WorkoutPosition::cleared());
            println!("position cleared");
        }
    }
    Ok(())
}
