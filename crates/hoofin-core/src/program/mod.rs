//! Training program data model.
//!
//! Program -> Week -> Session -> Interval, all immutable once loaded. The
//! JSON wire format matches the original program asset files.

mod library;
mod pace;

pub use library::ProgramLibrary;
pub use pace::{PaceDefinition, PaceGuide};

use serde::{Deserialize, Serialize};

use crate::error::ProgramError;

/// A timed segment of a session, e.g. "Walk" for 1.5 minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interval {
    #[serde(rename = "type")]
    pub kind: String,
    /// Duration in minutes. Positive; fractional values are common.
    pub duration: f64,
}

impl Interval {
    /// Interval length in whole seconds, rounded up.
    ///
    /// The ceiling is used consistently for both countdown seeding and
    /// progress denominators so the progress fraction stays in [0, 1].
    pub fn duration_secs(&self) -> u32 {
        (self.duration * 60.0).ceil().max(0.0) as u32
    }
}

/// One workout: an ordered, non-empty sequence of intervals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub intervals: Vec<Interval>,
}

impl Session {
    /// Total planned seconds across all intervals.
    pub fn total_secs(&self) -> u32 {
        self.intervals.iter().map(Interval::duration_secs).sum()
    }

    /// Seconds covered by intervals before `interval_index`.
    pub fn secs_before(&self, interval_index: usize) -> u32 {
        self.intervals
            .iter()
            .take(interval_index)
            .map(Interval::duration_secs)
            .sum()
    }
}

/// An ordered, non-empty sequence of sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Week {
    pub sessions: Vec<Session>,
}

/// The top-level training plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub weeks: Vec<Week>,
}

impl Program {
    /// Parse and validate a program from JSON.
    pub fn from_json(json: &str) -> Result<Self, ProgramError> {
        let program: Program = serde_json::from_str(json).map_err(|e| ProgramError::Parse {
            name: "<unnamed>".into(),
            message: e.to_string(),
        })?;
        program.validate()?;
        Ok(program)
    }

    /// Check the non-empty invariants: every reachable week has sessions and
    /// every reachable session has intervals.
    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.weeks.is_empty() {
            return Err(ProgramError::EmptyProgram(self.name.clone()));
        }
        for (wi, week) in self.weeks.iter().enumerate() {
            if week.sessions.is_empty() {
                return Err(ProgramError::EmptyWeek {
                    program: self.name.clone(),
                    week_index: wi,
                });
            }
            for (si, session) in week.sessions.iter().enumerate() {
                if session.intervals.is_empty() {
                    return Err(ProgramError::EmptySession {
                        program: self.name.clone(),
                        week_index: wi,
                        session_index: si,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn session_at(&self, week_index: usize, session_index: usize) -> Option<&Session> {
        self.weeks.get(week_index)?.sessions.get(session_index)
    }

    /// The (week, session) pair following the given one, or None at the end
    /// of the program.
    pub fn next_session_position(
        &self,
        week_index: usize,
        session_index: usize,
    ) -> Option<(usize, usize)> {
        let week = self.weeks.get(week_index)?;
        if session_index + 1 < week.sessions.len() {
            return Some((week_index, session_index + 1));
        }
        if week_index + 1 < self.weeks.len() {
            return Some((week_index + 1, 0));
        }
        None
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn interval_seconds_round_up() {
        let i = Interval {
            kind: "Walk".into(),
            duration: 0.51,
        };
        assert_eq!(i.duration_secs(), 31); // 30.6s -> 31
    }

    #[test]
    fn session_totals_use_ceilings() {
        let s = session(&[("Walk", 0.5), ("Jog", 1.25)]);
        assert_eq!(s.total_secs(), 30 + 75);
        assert_eq!(s.secs_before(1), 30);
    }

    #[test]
    fn parse_program_json() {
        let json = r#"{
            "name": "Walk to Run",
            "description": "Nine weeks",
            "weeks": [
                { "sessions": [ { "intervals": [ { "type": "Walk", "duration": 5 } ] } ] }
            ]
        }"#;
        let program = Program::from_json(json).unwrap();
        assert_eq!(program.name, "Walk to Run");
        assert_eq!(program.weeks[0].sessions[0].intervals[0].duration_secs(), 300);
    }

    #[test]
    fn validation_rejects_empty_session() {
        let json = r#"{
            "name": "Broken",
            "weeks": [ { "sessions": [ { "intervals": [] } ] } ]
        }"#;
        assert!(matches!(
            Program::from_json(json),
            Err(ProgramError::EmptySession { .. })
        ));
    }

    #[test]
    fn next_session_position_walks_the_program() {
        let p = two_week_program("P");
        assert_eq!(p.next_session_position(0, 0), Some((0, 1)));
        assert_eq!(p.next_session_position(0, 1), Some((1, 0)));
        assert_eq!(p.next_session_position(1, 1), None);
    }
}
