//! Program data provider.
//!
//! Loads program definition files (`*.json`) from a directory once and
//! caches them by name for the process lifetime. Malformed files are skipped
//! with a warning; loading is never fatal.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::StorageError;
use crate::storage::data_dir;

use super::Program;

#[derive(Debug, Default)]
struct LibraryState {
    loaded: bool,
    programs: HashMap<String, Arc<Program>>,
}

/// Caching lookup over a directory of program JSON files.
#[derive(Debug)]
pub struct ProgramLibrary {
    dir: PathBuf,
    state: Mutex<LibraryState>,
}

impl ProgramLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            state: Mutex::new(LibraryState::default()),
        }
    }

    /// Library over `<data_dir>/programs`.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self::new(data_dir()?.join("programs")))
    }

    /// Synchronous last-known lookup. The first call scans the directory.
    pub fn lookup(&self, name: &str) -> Option<Arc<Program>> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        self.ensure_loaded(&mut state);
        state.programs.get(name).cloned()
    }

    /// Names of all loaded programs, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        self.ensure_loaded(&mut state);
        let mut names: Vec<String> = state.programs.keys().cloned().collect();
        names.sort();
        names
    }

    /// Register a program directly, bypassing the directory scan.
    pub fn insert(&self, program: Program) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.programs.insert(program.name.clone(), Arc::new(program));
    }

    fn ensure_loaded(&self, state: &mut LibraryState) {
        if state.loaded {
            return;
        }
        state.loaded = true;

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("program directory {} unreadable: {e}", self.dir.display());
                return;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let json = match std::fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) => {
                    log::warn!("skipping {}: {e}", path.display());
                    continue;
                }
            };
            match Program::from_json(&json) {
                Ok(program) => {
                    log::debug!("loaded program '{}' from {}", program.name, path.display());
                    state
                        .programs
                        .insert(program.name.clone(), Arc::new(program));
                }
                Err(e) => log::warn!("skipping {}: {e}", path.display()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_caches_programs_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("walk.json"),
            r#"{ "name": "Walk to Run", "weeks": [
                { "sessions": [ { "intervals": [ { "type": "Walk", "duration": 5 } ] } ] }
            ] }"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let library = ProgramLibrary::new(dir.path());
        assert_eq!(library.names(), vec!["Walk to Run".to_string()]);

        let program = library.lookup("Walk to Run").unwrap();
        assert_eq!(program.weeks.len(), 1);
        assert!(library.lookup("Missing").is_none());
    }

    #[test]
    fn insert_bypasses_directory() {
        let library = ProgramLibrary::new("/nonexistent");
        library.insert(crate::program::test_support::two_week_program("Direct"));
        assert!(library.lookup("Direct").is_some());
    }
}
