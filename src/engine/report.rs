//! Engine output
//!
//! Notifications for the host to show, and read-only views of progress.

use std::fmt;

use serde::Serialize;

use super::grade::Grade;
use crate::config::XpRules;
use crate::error::SkillError;
use crate::progression::{Achievement, SkillNode};

/// Something worth telling the learner about
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    LevelUp {
        level: u32,
        skill_points: u32,
    },
    AchievementUnlocked {
        id: &'static str,
        name: &'static str,
        icon: &'static str,
        reward_xp: i64,
    },
    DailyBonus {
        xp: i64,
    },
}

impl From<&Achievement> for Notification {
    fn from(a: &Achievement) -> Self {
        Notification::AchievementUnlocked {
            id: a.id,
            name: a.name,
            icon: a.icon,
            reward_xp: a.reward_xp,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::LevelUp { level, skill_points } => write!(
                f,
                "LEVEL UP! You are now level {}! You earned {} skill point(s)!",
                level, skill_points
            ),
            Notification::AchievementUnlocked { name, icon, reward_xp, .. } => {
                write!(f, "Achievement Unlocked: {} {} (+{} XP)", icon, name, reward_xp)
            }
            Notification::DailyBonus { xp } => write!(f, "Daily Bonus: +{} XP", xp),
        }
    }
}

/// Result of one graded review
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeOutcome {
    /// `None` when the grade was rejected
    pub grade: Option<Grade>,
    pub earned_xp: i64,
    pub new_multiplier: f64,
    /// Level rose during this call, including a catch-up before the grade
    pub leveled_up: bool,
    pub new_level: u32,
    pub new_achievements: Vec<&'static str>,
    /// Streak kept by the shield on a Hard answer
    pub shielded: bool,
    /// Level-ups, unlocks and day-start bonuses, in the order they happened
    pub notifications: Vec<Notification>,
    /// Whether the result reached durable storage
    pub saved: bool,
}

impl GradeOutcome {
    /// Outcome that changes nothing
    pub fn neutral(multiplier: f64, level: u32) -> Self {
        Self {
            grade: None,
            earned_xp: 0,
            new_multiplier: multiplier,
            leveled_up: false,
            new_level: level,
            new_achievements: Vec::new(),
            shielded: false,
            notifications: Vec::new(),
            saved: false,
        }
    }
}

impl fmt::Display for GradeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.earned_xp >= 0 {
            write!(f, "+{} XP (x{:.1})", self.earned_xp, self.new_multiplier)
        } else {
            write!(f, "{} XP", self.earned_xp)
        }
    }
}

/// Status-bar view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplaySnapshot {
    pub level: u32,
    pub daily_xp: i64,
    pub total_xp: i64,
    pub multiplier: f64,
    pub streak: u32,
    pub progress_percent: u8,
}

impl fmt::Display for DisplaySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Level: {} | XP: {} | Total: {} | Multiplier: x{:.1} | Streak: {} | Level {}: {}%",
            self.level,
            self.daily_xp,
            self.total_xp,
            self.multiplier,
            self.streak,
            self.level + 1,
            self.progress_percent
        )
    }
}

/// Full stats view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub level: u32,
    pub max_level: u32,
    pub progress_percent: u8,
    pub xp_to_next: i64,
    pub daily_xp: i64,
    pub total_xp: i64,
    pub streak: u32,
    pub multiplier: f64,
    pub high_score: i64,
    pub skill_points: u32,
    pub study_streak: u32,
    pub achievements_earned: usize,
    pub achievements_total: usize,
    pub rules: XpRules,
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Level:                  {}", self.level)?;
        writeln!(f, "Progress to Level {}:    {}%", self.level + 1, self.progress_percent)?;
        writeln!(f, "XP Needed:              {}", self.xp_to_next)?;
        writeln!(f, "Daily XP:               {}", self.daily_xp)?;
        writeln!(f, "Total XP:               {}", self.total_xp)?;
        writeln!(f, "Current Streak:         {} cards", self.streak)?;
        writeln!(f, "Current Multiplier:     x{:.1}", self.multiplier)?;
        writeln!(f, "High Score:             {}", self.high_score)?;
        writeln!(f, "Skill Points Available: {}", self.skill_points)?;
        writeln!(f, "Study Streak:           {} days", self.study_streak)?;
        writeln!(
            f,
            "Achievements:           {}/{}",
            self.achievements_earned, self.achievements_total
        )?;
        writeln!(f)?;
        writeln!(f, "Again: {} XP | Hard: {} XP | Good: +{} XP | Easy: +{} XP",
            self.rules.base_xp_again, self.rules.base_xp_hard,
            self.rules.base_xp_good, self.rules.base_xp_easy)?;
        write!(
            f,
            "Max multiplier: x{:.1} | {} skill point(s) per level | Max level: {}",
            self.rules.max_multiplier, self.rules.skill_points_per_level, self.max_level
        )
    }
}

/// One skill tree node with the learner's standing on it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillStatus {
    pub node: &'static SkillNode,
    pub level: u32,
    /// Why the next level can't be bought right now
    #[serde(serialize_with = "serialize_blocker")]
    pub blocked_by: Option<SkillError>,
}

impl SkillStatus {
    pub fn can_upgrade(&self) -> bool {
        self.blocked_by.is_none()
    }
}

fn serialize_blocker<S: serde::Serializer>(
    blocker: &Option<SkillError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match blocker {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

/// One achievement as the learner may see it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementStatus {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub reward_xp: i64,
    pub earned: bool,
    pub date: Option<String>,
}
