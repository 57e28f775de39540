//! Progression state record
//!
//! The single persisted record of a learner's progress.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SaveError;
use crate::progression::skills::{SkillId, SkillLevels};

/// Date format used for every stored day
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Earned marker for one achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub earned: bool,
    pub date: String,
}

/// Persistent progression record.
///
/// Missing fields fall back to [`Default`] on load, so older records keep
/// working as fields are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionState {
    /// XP earned today (can dip below zero on a bad day)
    pub daily_xp: i64,
    /// XP earned overall, never reset
    pub total_xp: i64,
    pub multiplier: f64,
    /// Consecutive Good/Easy answers
    pub streak: u32,
    /// Best `daily_xp` seen at a day boundary
    pub high_score: i64,
    /// Day of the last rollover (YYYY-MM-DD)
    pub date: String,
    pub level: u32,
    pub skill_points: u32,
    pub skills: SkillLevels,
    pub achievements: BTreeMap<String, AchievementRecord>,
    /// Archived `daily_xp` per past day
    pub xp_history: BTreeMap<String, i64>,
    /// Consecutive calendar days studied
    pub study_streak: u32,
    pub last_study_date: String,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self {
            daily_xp: 0,
            total_xp: 0,
            multiplier: 1.0,
            streak: 0,
            high_score: 0,
            date: String::new(),
            level: 1,
            skill_points: 0,
            skills: BTreeMap::new(),
            achievements: BTreeMap::new(),
            xp_history: BTreeMap::new(),
            study_streak: 0,
            last_study_date: String::new(),
        }
    }
}

impl ProgressionState {
    /// Fresh state for a first run (or after a reset) on `today`
    pub fn fresh(today: &str) -> Self {
        Self {
            date: today.to_string(),
            last_study_date: today.to_string(),
            study_streak: 1,
            ..Self::default()
        }
    }

    /// Check if an achievement has been earned
    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.get(id).map(|a| a.earned).unwrap_or(false)
    }

    /// Check that a loaded record is usable.
    ///
    /// Unknown skill ids are tolerated and ignored; known skills must be
    /// within their max level. The multiplier only has to be a number: its
    /// range depends on the tuning in effect and is clamped by the engine.
    pub fn validate(&self) -> Result<(), SaveError> {
        if !self.multiplier.is_finite() {
            return Err(SaveError::Corrupt(format!("multiplier {}", self.multiplier)));
        }

        if self.level == 0 {
            return Err(SaveError::Corrupt("level 0".to_string()));
        }

        for date in [&self.date, &self.last_study_date] {
            check_date(date)?;
        }
        for date in self.xp_history.keys() {
            check_date(date)?;
        }

        for id in SkillId::ALL {
            let level = self.skills.get(id.as_str()).copied().unwrap_or(0);
            if level > id.node().max_level {
                return Err(SaveError::Corrupt(format!(
                    "skill {} at level {} (max {})",
                    id,
                    level,
                    id.node().max_level
                )));
            }
        }

        Ok(())
    }
}

fn check_date(date: &str) -> Result<(), SaveError> {
    if date.is_empty() {
        return Ok(());
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map(|_| ())
        .map_err(|e| SaveError::Corrupt(format!("bad date '{}': {}", date, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_backfilled() {
        let json = r#"{"daily_xp": 12, "total_xp": 340, "date": "2024-01-02"}"#;
        let state: ProgressionState = serde_json::from_str(json).unwrap();
        assert_eq!(state.daily_xp, 12);
        assert_eq!(state.total_xp, 340);
        assert_eq!(state.multiplier, 1.0);
        assert_eq!(state.level, 1);
        assert!(state.skills.is_empty());
        assert_eq!(state.last_study_date, "");
    }

    #[test]
    fn test_fresh_state() {
        let state = ProgressionState::fresh("2024-01-02");
        assert_eq!(state.date, "2024-01-02");
        assert_eq!(state.last_study_date, "2024-01-02");
        assert_eq!(state.study_streak, 1);
        assert_eq!(state.level, 1);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_records() {
        let mut state = ProgressionState::fresh("2024-01-02");
        state.multiplier = f64::NAN;
        assert!(matches!(state.validate(), Err(SaveError::Corrupt(_))));

        let mut state = ProgressionState::fresh("2024-01-02");
        state.skills.insert("recovery".to_string(), 3);
        assert!(state.validate().is_err());

        let mut state = ProgressionState::fresh("2024-01-02");
        state.xp_history.insert("yesterday".to_string(), 10);
        assert!(state.validate().is_err());

        let mut state = ProgressionState::fresh("2024-01-02");
        state.skills.insert("retired_skill".to_string(), 9);
        assert!(state.validate().is_ok());

        let mut state = ProgressionState::fresh("2024-01-02");
        state.multiplier = 7.5;
        assert!(state.validate().is_ok());
    }
}
