mod controller;
mod state;

pub use controller::WorkoutController;
pub use state::WorkoutEngine;
