//! Skill tree
//!
//! Upgrades bought with skill points, and how their levels bend the XP rules.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::Serialize;

use crate::error::SkillError;

/// Unlocked skill levels keyed by skill id
pub type SkillLevels = BTreeMap<String, u32>;

/// Known skill tree nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillId {
    XpBoost,
    MultiplierBoost,
    StreakShield,
    Recovery,
    DailyBonus,
}

impl SkillId {
    pub const ALL: [SkillId; 5] = [
        SkillId::XpBoost,
        SkillId::MultiplierBoost,
        SkillId::StreakShield,
        SkillId::Recovery,
        SkillId::DailyBonus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillId::XpBoost => "xp_boost",
            SkillId::MultiplierBoost => "multiplier_boost",
            SkillId::StreakShield => "streak_shield",
            SkillId::Recovery => "recovery",
            SkillId::DailyBonus => "daily_bonus",
        }
    }

    /// Catalog entry for this skill
    pub fn node(&self) -> &'static SkillNode {
        // SKILL_TREE is declared in SkillId::ALL order
        &SKILL_TREE[*self as usize]
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillId {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| SkillError::UnknownSkill(s.to_string()))
    }
}

/// Another skill that must reach a level first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prerequisite {
    pub skill: SkillId,
    pub min_level: u32,
}

/// A skill tree node definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkillNode {
    pub id: SkillId,
    pub name: &'static str,
    pub description: &'static str,
    pub max_level: u32,
    pub effect_per_level: f64,
    /// Skill points per level
    pub cost: u32,
    pub prerequisite: Option<Prerequisite>,
    pub icon: &'static str,
}

pub static SKILL_TREE: [SkillNode; 5] = [
    SkillNode {
        id: SkillId::XpBoost,
        name: "XP Boost",
        description: "Increases base XP earned by 10% per level",
        max_level: 5,
        effect_per_level: 0.1,
        cost: 1,
        prerequisite: None,
        icon: "⬆️",
    },
    SkillNode {
        id: SkillId::MultiplierBoost,
        name: "Multiplier Boost",
        description: "Increases the multiplier increment by 0.05 per level",
        max_level: 3,
        effect_per_level: 0.05,
        cost: 1,
        prerequisite: Some(Prerequisite { skill: SkillId::XpBoost, min_level: 1 }),
        icon: "✖️",
    },
    SkillNode {
        id: SkillId::StreakShield,
        name: "Streak Shield",
        description: "20% chance per level to keep your streak on Hard answers",
        max_level: 3,
        effect_per_level: 0.2,
        cost: 1,
        prerequisite: None,
        icon: "🛡️",
    },
    SkillNode {
        id: SkillId::Recovery,
        name: "Quick Recovery",
        description: "Reduces multiplier decay by 0.1 per level",
        max_level: 2,
        effect_per_level: 0.1,
        cost: 1,
        prerequisite: Some(Prerequisite { skill: SkillId::StreakShield, min_level: 2 }),
        icon: "🔄",
    },
    SkillNode {
        id: SkillId::DailyBonus,
        name: "Daily Bonus",
        description: "Earn 25 bonus XP at the start of each day per level",
        max_level: 4,
        effect_per_level: 25.0,
        cost: 1,
        prerequisite: Some(Prerequisite { skill: SkillId::XpBoost, min_level: 2 }),
        icon: "🎁",
    },
];

/// Current level of a skill (0 if never bought)
pub fn skill_level(levels: &SkillLevels, id: SkillId) -> u32 {
    levels.get(id.as_str()).copied().unwrap_or(0)
}

/// Number of skills with at least one level
pub fn unlocked_count(levels: &SkillLevels) -> usize {
    SkillId::ALL.iter().filter(|id| skill_level(levels, **id) > 0).count()
}

/// Whether any skill sits at its max level
pub fn has_maxed_skill(levels: &SkillLevels) -> bool {
    SKILL_TREE.iter().any(|node| skill_level(levels, node.id) >= node.max_level)
}

/// Validate buying the next level of `id`.
///
/// Checks run in order: max level, prerequisite, then points. Returns the
/// node so the caller can charge its cost.
pub fn check_upgrade(
    levels: &SkillLevels,
    available_points: u32,
    id: SkillId,
) -> Result<&'static SkillNode, SkillError> {
    let node = id.node();

    if skill_level(levels, id) >= node.max_level {
        return Err(SkillError::MaxLevel(node.name));
    }

    if let Some(req) = node.prerequisite {
        if skill_level(levels, req.skill) < req.min_level {
            return Err(SkillError::PrerequisiteNotMet {
                skill: req.skill.node().name,
                level: req.min_level,
            });
        }
    }

    if available_points < node.cost {
        return Err(SkillError::NotEnoughPoints {
            needed: node.cost,
            available: available_points,
        });
    }

    Ok(node)
}

/// Effects that skills can modify
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Scales positive base XP
    XpBoost,
    /// Added to the multiplier step on Good/Easy
    MultiplierIncrement,
    /// Chance to keep the streak on Hard
    StreakShield,
    /// Subtracted from the multiplier decay on Hard
    MultiplierDecay,
    /// Flat XP granted at day start
    DailyBonus,
}

impl EffectKind {
    /// Skill whose level drives this effect
    pub fn skill(&self) -> SkillId {
        match self {
            EffectKind::XpBoost => SkillId::XpBoost,
            EffectKind::MultiplierIncrement => SkillId::MultiplierBoost,
            EffectKind::StreakShield => SkillId::StreakShield,
            EffectKind::MultiplierDecay => SkillId::Recovery,
            EffectKind::DailyBonus => SkillId::DailyBonus,
        }
    }
}

/// Applies unlocked skill levels to base values
#[derive(Debug, Clone, Copy)]
pub struct SkillEffects<'a> {
    levels: &'a SkillLevels,
}

impl<'a> SkillEffects<'a> {
    pub fn new(levels: &'a SkillLevels) -> Self {
        Self { levels }
    }

    fn strength(&self, kind: EffectKind) -> Option<f64> {
        let id = kind.skill();
        let level = skill_level(self.levels, id);
        (level > 0).then(|| level as f64 * id.node().effect_per_level)
    }

    /// Adjust a numeric base value.
    ///
    /// Unskilled effects and the (boolean) streak shield pass `base` through.
    pub fn resolve(&self, kind: EffectKind, base: f64) -> f64 {
        let Some(strength) = self.strength(kind) else {
            return base;
        };
        match kind {
            EffectKind::XpBoost => base * (1.0 + strength),
            EffectKind::MultiplierIncrement | EffectKind::DailyBonus => base + strength,
            EffectKind::MultiplierDecay => (base - strength).max(0.0),
            EffectKind::StreakShield => base,
        }
    }

    /// Roll the streak shield. Never draws from `rng` when unskilled.
    pub fn shield_activates<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        match self.strength(EffectKind::StreakShield) {
            Some(chance) => rng.gen::<f64>() < chance,
            None => false,
        }
    }

    /// Bonus XP granted when a new day starts
    pub fn daily_bonus(&self) -> i64 {
        self.resolve(EffectKind::DailyBonus, 0.0).round() as i64
    }
}
