//! Achievements
//!
//! One-time milestones that pay out bonus XP.

use serde::Serialize;

use super::skills::{has_maxed_skill, unlocked_count};
use crate::config::XpRules;
use crate::save::{AchievementRecord, ProgressionState};

/// Condition an achievement waits for
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "threshold", rename_all = "snake_case")]
pub enum Requirement {
    Level(u32),
    DailyXp(i64),
    Streak(u32),
    /// Multiplier threshold, capped at the configured maximum
    Multiplier(f64),
    /// Distinct skills with at least one level
    SkillsUnlocked(usize),
    /// Any skill at its max level
    AnySkillMaxed,
    StudyStreak(u32),
}

impl Requirement {
    /// Check the requirement against current progress
    pub fn is_met(&self, state: &ProgressionState, rules: &XpRules) -> bool {
        match *self {
            Requirement::Level(n) => state.level >= n,
            Requirement::DailyXp(n) => state.daily_xp >= n,
            Requirement::Streak(n) => state.streak >= n,
            Requirement::Multiplier(m) => state.multiplier >= m.min(rules.max_multiplier),
            Requirement::SkillsUnlocked(n) => unlocked_count(&state.skills) >= n,
            Requirement::AnySkillMaxed => has_maxed_skill(&state.skills),
            Requirement::StudyStreak(n) => state.study_streak >= n,
        }
    }
}

/// Achievement definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub requirement: Requirement,
    pub reward_xp: i64,
    pub icon: &'static str,
    pub hidden: bool,
}

pub static ACHIEVEMENTS: [Achievement; 9] = [
    Achievement {
        id: "novice",
        name: "Novice Learner",
        description: "Reach level 5",
        requirement: Requirement::Level(5),
        reward_xp: 100,
        icon: "🎓",
        hidden: false,
    },
    Achievement {
        id: "intermediate",
        name: "Intermediate Scholar",
        description: "Reach level 10",
        requirement: Requirement::Level(10),
        reward_xp: 250,
        icon: "📚",
        hidden: false,
    },
    Achievement {
        id: "advanced",
        name: "Advanced Academic",
        description: "Reach level 25",
        requirement: Requirement::Level(25),
        reward_xp: 500,
        icon: "🧠",
        hidden: false,
    },
    Achievement {
        id: "combo_master",
        name: "Combo Master",
        description: "Reach a 10-card streak",
        requirement: Requirement::Streak(10),
        reward_xp: 50,
        icon: "🔥",
        hidden: false,
    },
    Achievement {
        id: "multiplier_king",
        name: "Multiplier King",
        description: "Reach maximum multiplier (5x)",
        requirement: Requirement::Multiplier(5.0),
        reward_xp: 100,
        icon: "👑",
        hidden: false,
    },
    Achievement {
        id: "skill_starter",
        name: "Skill Starter",
        description: "Unlock your first skill",
        requirement: Requirement::SkillsUnlocked(1),
        reward_xp: 50,
        icon: "🌱",
        hidden: false,
    },
    Achievement {
        id: "persistent",
        name: "Persistent Student",
        description: "Study for 7 consecutive days",
        requirement: Requirement::StudyStreak(7),
        reward_xp: 150,
        icon: "📅",
        hidden: false,
    },
    Achievement {
        id: "marathon",
        name: "Marathon Session",
        description: "Earn 500 XP in a single day",
        requirement: Requirement::DailyXp(500),
        reward_xp: 100,
        icon: "🏃",
        hidden: false,
    },
    Achievement {
        id: "skill_master",
        name: "Skill Master",
        description: "Max out any skill",
        requirement: Requirement::AnySkillMaxed,
        reward_xp: 200,
        icon: "🌟",
        hidden: true,
    },
];

/// Look up an achievement by id
pub fn find_achievement(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Unlock every achievement whose requirement now holds.
///
/// Earned entries are skipped, so each pays out at most once. Rewards go to
/// `total_xp` only; the level is not recomputed here.
pub fn check_achievements(
    state: &mut ProgressionState,
    rules: &XpRules,
    today: &str,
) -> Vec<&'static Achievement> {
    let mut unlocked = Vec::new();

    for achievement in ACHIEVEMENTS.iter() {
        if state.has_achievement(achievement.id) {
            continue;
        }
        if !achievement.requirement.is_met(state, rules) {
            continue;
        }

        state.achievements.insert(
            achievement.id.to_string(),
            AchievementRecord {
                earned: true,
                date: today.to_string(),
            },
        );
        state.total_xp = state.total_xp.saturating_add(achievement.reward_xp);
        log::info!("Achievement unlocked: {} (+{} XP)", achievement.id, achievement.reward_xp);
        unlocked.push(achievement);
    }

    unlocked
}
