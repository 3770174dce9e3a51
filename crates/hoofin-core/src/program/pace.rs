//! Pace guide: reference descriptions for interval kinds.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ProgramError;

/// How a pace should feel, keyed by interval kind ("Walk", "Jog", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaceDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(rename = "perceivedEffort")]
    pub perceived_effort: String,
    #[serde(rename = "physicalSigns")]
    pub physical_signs: String,
}

#[derive(Debug, Deserialize)]
struct PaceFile {
    #[serde(rename = "paceDefinitions")]
    pace_definitions: Vec<PaceDefinition>,
}

/// Read-only collection of pace definitions.
#[derive(Debug, Clone, Default)]
pub struct PaceGuide {
    definitions: Vec<PaceDefinition>,
}

impl PaceGuide {
    pub fn from_json(json: &str) -> Result<Self, ProgramError> {
        let file: PaceFile = serde_json::from_str(json).map_err(|e| ProgramError::Parse {
            name: "pace definitions".into(),
            message: e.to_string(),
        })?;
        Ok(Self {
            definitions: file.pace_definitions,
        })
    }

    /// Load from a JSON file, returning an empty guide if the file is absent.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                log::warn!("pace definitions unusable: {e}");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn lookup(&self, kind: &str) -> Option<&PaceDefinition> {
        self.definitions
            .iter()
            .find(|d| d.kind.eq_ignore_ascii_case(kind))
    }

    pub fn definitions(&self) -> &[PaceDefinition] {
        &self.definitions
    }
}
