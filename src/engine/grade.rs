//! Grade processing
//!
//! Turns one graded review into streak, multiplier, XP and level changes.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use super::report::{GradeOutcome, Notification};
use crate::config::{EngineConfig, XpRules};
use crate::error::EngineError;
use crate::progression::{check_achievements, EffectKind, SkillEffects};
use crate::save::ProgressionState;

/// How well a card was recalled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    /// Map a host ease code (1-4)
    pub fn from_ease(ease: u8) -> Result<Self, EngineError> {
        match ease {
            1 => Ok(Grade::Again),
            2 => Ok(Grade::Hard),
            3 => Ok(Grade::Good),
            4 => Ok(Grade::Easy),
            _ => Err(EngineError::InvalidGrade(ease)),
        }
    }

    /// Parse a grade name or ease code
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "again" | "1" => Some(Grade::Again),
            "hard" | "2" => Some(Grade::Hard),
            "good" | "3" => Some(Grade::Good),
            "easy" | "4" => Some(Grade::Easy),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Grade::Again => "Again",
            Grade::Hard => "Hard",
            Grade::Good => "Good",
            Grade::Easy => "Easy",
        }
    }

    /// Again and Hard break the streak
    pub fn is_break(&self) -> bool {
        matches!(self, Grade::Again | Grade::Hard)
    }

    /// Base XP before boosts and multiplier
    pub fn base_xp(&self, rules: &XpRules) -> i64 {
        match self {
            Grade::Again => rules.base_xp_again,
            Grade::Hard => rules.base_xp_hard,
            Grade::Good => rules.base_xp_good,
            Grade::Easy => rules.base_xp_easy,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Keep the multiplier at hundredths within [1.0, max]
pub(crate) fn bound_multiplier(value: f64, max: f64) -> f64 {
    let bounded = value.max(1.0).min(max);
    (bounded * 100.0).round() / 100.0
}

/// Recompute the level from total XP, paying skill points for any gain
pub(crate) fn sync_level(state: &mut ProgressionState, config: &EngineConfig) -> Option<Notification> {
    let old_level = state.level;
    let new_level = config.levels.level(state.total_xp);
    state.level = new_level;

    if new_level <= old_level {
        return None;
    }

    let points = (new_level - old_level) * config.xp.skill_points_per_level;
    state.skill_points = state.skill_points.saturating_add(points);
    log::info!("Level up: {} -> {} (+{} skill points)", old_level, new_level, points);

    Some(Notification::LevelUp {
        level: new_level,
        skill_points: points,
    })
}

/// Apply one grade to `state`.
///
/// The multiplier moves first; positive XP is then boosted and scaled by the
/// updated multiplier, while penalties are taken as-is.
pub fn apply_grade<R: Rng + ?Sized>(
    state: &mut ProgressionState,
    grade: Grade,
    config: &EngineConfig,
    rng: &mut R,
    today: &str,
) -> GradeOutcome {
    let rules = &config.xp;
    let fx = SkillEffects::new(&state.skills);
    let mut shielded = false;

    let multiplier = match grade {
        Grade::Again => {
            state.streak = 0;
            state.multiplier - rules.multiplier_decay
        }
        Grade::Hard => {
            shielded = fx.shield_activates(rng);
            if !shielded {
                state.streak = 0;
            }
            state.multiplier - fx.resolve(EffectKind::MultiplierDecay, rules.multiplier_decay)
        }
        Grade::Good => {
            state.streak = state.streak.saturating_add(1);
            state.multiplier + fx.resolve(EffectKind::MultiplierIncrement, rules.multiplier_increment)
        }
        Grade::Easy => {
            state.streak = state.streak.saturating_add(1);
            state.multiplier
                + fx.resolve(EffectKind::MultiplierIncrement, rules.multiplier_increment * 2.0)
        }
    };
    state.multiplier = bound_multiplier(multiplier, rules.max_multiplier);

    let base_xp = grade.base_xp(rules);
    let earned_xp = if base_xp > 0 {
        let boosted = fx.resolve(EffectKind::XpBoost, base_xp as f64);
        // Absorb float noise before truncating
        (boosted * state.multiplier + 1e-9).trunc() as i64
    } else {
        base_xp
    };

    state.daily_xp = state.daily_xp.saturating_add(earned_xp);
    state.total_xp = state.total_xp.saturating_add(earned_xp);

    let mut notifications = Vec::new();
    let level_up = sync_level(state, config);
    let leveled_up = level_up.is_some();
    notifications.extend(level_up);

    let unlocked = check_achievements(state, rules, today);
    notifications.extend(unlocked.iter().map(|a| Notification::from(*a)));

    log::debug!(
        "{}: {:+} XP, multiplier x{:.2}, streak {}",
        grade,
        earned_xp,
        state.multiplier,
        state.streak
    );

    GradeOutcome {
        grade: Some(grade),
        earned_xp,
        new_multiplier: state.multiplier,
        leveled_up,
        new_level: state.level,
        new_achievements: unlocked.iter().map(|a| a.id).collect(),
        shielded,
        notifications,
        saved: false,
    }
}
