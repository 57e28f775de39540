//! Progression systems

pub mod xp;
pub mod skills;
pub mod achievements;

pub use xp::{level_for, LevelCurve, LevelProgress};
pub use skills::{EffectKind, Prerequisite, SkillEffects, SkillId, SkillLevels, SkillNode, SKILL_TREE};
pub use achievements::{check_achievements, find_achievement, Achievement, Requirement, ACHIEVEMENTS};
