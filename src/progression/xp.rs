//! Experience and leveling
//!
//! Maps cumulative XP onto levels along a geometric curve.

use serde::{Deserialize, Serialize};

/// Level curve parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelCurve {
    /// XP needed to go from level 1 to level 2
    pub base_xp: i64,
    /// Growth factor applied per level
    pub factor: f64,
    /// Hard level cap
    pub max_level: u32,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            base_xp: 100,
            factor: 1.5,
            max_level: 100,
        }
    }
}

/// Where a given XP total sits on the curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelProgress {
    pub level: u32,
    /// Share of the current level's requirement already earned (0-100)
    pub progress_percent: u8,
    /// XP still missing for the next level (0 at the cap)
    pub xp_to_next: i64,
}

impl LevelCurve {
    /// XP needed to advance from `level` to `level + 1`
    pub fn xp_for_level(&self, level: u32) -> i64 {
        let exponent = level.saturating_sub(1) as i32;
        // Float-to-int casts saturate, so huge levels clamp at i64::MAX
        (self.base_xp as f64 * self.factor.powi(exponent)).floor() as i64
    }

    /// Total XP needed from level 1 to reach `level`
    pub fn total_xp_for_level(&self, level: u32) -> i64 {
        (1..level).fold(0i64, |acc, l| acc.saturating_add(self.xp_for_level(l)))
    }

    /// Resolve a cumulative XP total into level and progress
    pub fn progress(&self, total_xp: i64) -> LevelProgress {
        let mut level = 1;
        let mut level_start = 0i64;
        let mut threshold = self.xp_for_level(1);

        while total_xp >= threshold && level < self.max_level {
            level += 1;
            level_start = threshold;
            threshold = threshold.saturating_add(self.xp_for_level(level));
        }

        if level >= self.max_level {
            return LevelProgress {
                level,
                progress_percent: 100,
                xp_to_next: 0,
            };
        }

        let required = threshold.saturating_sub(level_start).max(1);
        let earned = total_xp.saturating_sub(level_start);
        let percent = (earned as f64 / required as f64 * 100.0).clamp(0.0, 100.0);

        LevelProgress {
            level,
            progress_percent: percent as u8,
            xp_to_next: threshold.saturating_sub(total_xp),
        }
    }

    /// Level reached with `total_xp`
    pub fn level(&self, total_xp: i64) -> u32 {
        self.progress(total_xp).level
    }
}

/// Level progress on the default curve
pub fn level_for(total_xp: i64) -> LevelProgress {
    LevelCurve::default().progress(total_xp)
}
