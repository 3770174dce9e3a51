//! Core error types for hoofin-core.
//!
//! Index errors are deliberately absent: out-of-range interval/session/week
//! indices are clamped or refused locally (see the engine contract), never
//! propagated as errors.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for hoofin-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Program data errors
    #[error("Program error: {0}")]
    Program(#[from] ProgramError),
}

/// Storage-specific errors (SQLite kv store and TOML configuration).
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    ConfigLoad { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    ConfigSave { path: PathBuf, message: String },

    /// Invalid configuration key or value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Program-data errors.
#[derive(Error, Debug)]
pub enum ProgramError {
    /// Program not present in the library
    #[error("Program not found: {0}")]
    NotFound(String),

    /// Program JSON could not be parsed
    #[error("Failed to parse program '{name}': {message}")]
    Parse { name: String, message: String },

    /// Program has no weeks
    #[error("Program '{0}' has no weeks")]
    EmptyProgram(String),

    /// Week has no sessions
    #[error("Week {week_index} of program '{program}' has no sessions")]
    EmptyWeek { program: String, week_index: usize },

    /// Session has no intervals
    #[error("Session {session_index} of week {week_index} in program '{program}' has no intervals")]
    EmptySession {
        program: String,
        week_index: usize,
        session_index: usize,
    },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
