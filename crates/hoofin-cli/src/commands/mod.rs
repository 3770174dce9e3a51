pub mod config;
pub mod position;
pub mod program;
pub mod workout;
