//! Engine tuning
//!
//! XP rules and the level curve, loadable from a RON file with fallback to
//! the built-in values.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::progression::LevelCurve;

/// XP and multiplier rules per grade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XpRules {
    pub base_xp_again: i64,
    pub base_xp_hard: i64,
    pub base_xp_good: i64,
    pub base_xp_easy: i64,
    /// Multiplier gain on Good (doubled on Easy)
    pub multiplier_increment: f64,
    /// Multiplier loss on Again/Hard
    pub multiplier_decay: f64,
    pub max_multiplier: f64,
    pub skill_points_per_level: u32,
}

impl Default for XpRules {
    fn default() -> Self {
        Self {
            base_xp_again: -5,
            base_xp_hard: -2,
            base_xp_good: 5,
            base_xp_easy: 10,
            multiplier_increment: 0.2,
            multiplier_decay: 0.5,
            max_multiplier: 5.0,
            skill_points_per_level: 1,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub xp: XpRules,
    pub levels: LevelCurve,
}

impl EngineConfig {
    /// Load from a RON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match ron::from_str(&content) {
                    Ok(config) => {
                        log::info!("Config loaded from {:?}", path);
                        return config;
                    }
                    Err(e) => log::warn!("Failed to parse {:?}: {}, using defaults", path, e),
                },
                Err(e) => log::warn!("Failed to read {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Write the current values as pretty RON for editing
    pub fn export(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {:?}: {}", parent, e))?;
        }

        let ron = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, ron).map_err(|e| format!("Failed to write {:?}: {}", path, e))?;

        Ok(())
    }
}
