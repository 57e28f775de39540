//! Progression engine
//!
//! Owns one learner's state and runs every operation against it:
//! load and rollover, grading, skill purchases and resets. Every
//! mutation is followed by a full save.

pub mod clock;
pub mod grade;
pub mod host;
pub mod report;
pub mod rollover;

pub use clock::{Clock, ManualClock, SystemClock};
pub use grade::{apply_grade, Grade};
pub use host::{attach_to_host, AnswerHandler, ReviewHost};
pub use report::{
    AchievementStatus, DisplaySnapshot, GradeOutcome, Notification, SkillStatus, StatsReport,
};
pub use rollover::{roll_over, Rollover};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use self::grade::bound_multiplier;
use crate::config::EngineConfig;
use crate::error::{EngineError, SaveError};
use crate::progression::skills::{check_upgrade, skill_level};
use crate::progression::{check_achievements, SkillId, ACHIEVEMENTS, SKILL_TREE};
use crate::save::{ProgressionState, StateStore, DATE_FORMAT};

/// Result of buying a skill level
#[derive(Debug, Clone, PartialEq)]
pub struct SkillUpgrade {
    pub skill: SkillId,
    pub new_level: u32,
    pub notifications: Vec<Notification>,
    pub saved: bool,
}

/// Single-learner progression engine.
///
/// Not re-entrant: callers deliver one operation at a time.
pub struct Engine {
    state: ProgressionState,
    config: EngineConfig,
    store: Box<dyn StateStore>,
    rng: Box<dyn RngCore + Send>,
    clock: Box<dyn Clock>,
    initialized: bool,
}

impl Engine {
    /// Engine over `store` with default config, system clock and OS entropy
    pub fn new(store: impl StateStore + 'static) -> Self {
        Self {
            state: ProgressionState::default(),
            config: EngineConfig::default(),
            store: Box::new(store),
            rng: Box::new(StdRng::from_entropy()),
            clock: Box::new(SystemClock),
            initialized: false,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the random source used for streak shield rolls
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn today(&self) -> String {
        self.clock.today().format(DATE_FORMAT).to_string()
    }

    /// Write the full state out. Failures are logged, never undone.
    fn persist(&mut self) -> bool {
        match self.store.save(&self.state) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to save progress to {}: {}", self.store.location(), e);
                false
            }
        }
    }

    /// Load and check the stored record.
    ///
    /// A multiplier outside the current tuning is pulled back into range
    /// rather than discarding the record.
    fn load_validated(&self) -> Result<ProgressionState, SaveError> {
        let mut state = self.store.load()?;
        state.validate()?;

        let bounded = bound_multiplier(state.multiplier, self.config.xp.max_multiplier);
        if bounded != state.multiplier {
            log::warn!(
                "Stored multiplier x{} outside 1..={}, using x{}",
                state.multiplier,
                self.config.xp.max_multiplier,
                bounded
            );
            state.multiplier = bounded;
        }
        Ok(state)
    }

    /// Load (or create) the state and roll it over to today.
    ///
    /// Always leaves the engine in a valid state: unreadable or corrupt
    /// storage is replaced with fresh progress.
    pub fn initialize(&mut self) -> Vec<Notification> {
        match self.load_validated() {
            Ok(state) => {
                log::info!("Progress loaded from {}", self.store.location());
                self.state = state;
            }
            Err(SaveError::NotFound(_)) => {
                log::info!("No saved progress, starting fresh");
                self.state = ProgressionState::fresh(&self.today());
                self.persist();
            }
            Err(e) => {
                log::warn!("Failed to load progress: {}, starting fresh", e);
                self.state = ProgressionState::fresh(&self.today());
                self.persist();
            }
        }
        self.initialized = true;

        let rollover = roll_over(&mut self.state, self.clock.today(), &self.config);
        self.persist();
        rollover.notifications
    }

    /// Run the day rollover, loading first if needed
    fn catch_up(&mut self) -> Vec<Notification> {
        if !self.initialized {
            return self.initialize();
        }
        roll_over(&mut self.state, self.clock.today(), &self.config).notifications
    }

    /// Score one graded review
    pub fn process_grade(&mut self, grade: Grade) -> GradeOutcome {
        let mut notifications = self.catch_up();
        let caught_up_level = notifications
            .iter()
            .any(|n| matches!(n, Notification::LevelUp { .. }));
        let today = self.today();

        let mut outcome = apply_grade(
            &mut self.state,
            grade,
            &self.config,
            &mut *self.rng,
            &today,
        );

        outcome.leveled_up |= caught_up_level;
        notifications.append(&mut outcome.notifications);
        outcome.notifications = notifications;
        outcome.saved = self.persist();
        outcome
    }

    /// Score a host ease code (1 = again .. 4 = easy).
    ///
    /// Unknown codes change nothing and yield a neutral outcome.
    pub fn process_ease(&mut self, ease: u8) -> GradeOutcome {
        match Grade::from_ease(ease) {
            Ok(grade) => self.process_grade(grade),
            Err(e) => {
                log::warn!("Ignoring review: {}", e);
                GradeOutcome::neutral(self.state.multiplier, self.state.level)
            }
        }
    }

    /// Spend skill points on the next level of `skill`.
    ///
    /// A refused purchase still saves whatever the rollover changed.
    pub fn unlock_skill(&mut self, skill: &str) -> Result<SkillUpgrade, EngineError> {
        let mut notifications = self.catch_up();

        let checked = skill.parse::<SkillId>().and_then(|id| {
            check_upgrade(&self.state.skills, self.state.skill_points, id).map(|node| (id, node))
        });
        let (id, node) = match checked {
            Ok(found) => found,
            Err(e) => {
                log::info!("Skill upgrade refused: {}", e);
                self.persist();
                return Err(e.into());
            }
        };
        self.state.skill_points -= node.cost;
        let level = self.state.skills.entry(id.as_str().to_string()).or_insert(0);
        *level += 1;
        let new_level = *level;
        log::info!("Skill {} raised to level {}", id, new_level);

        let today = self.today();
        let unlocked = check_achievements(&mut self.state, &self.config.xp, &today);
        notifications.extend(unlocked.into_iter().map(Notification::from));

        Ok(SkillUpgrade {
            skill: id,
            new_level,
            notifications,
            saved: self.persist(),
        })
    }

    /// Wipe all progress back to a fresh start
    pub fn reset(&mut self) -> bool {
        log::info!("Resetting progress");
        self.state = ProgressionState::fresh(&self.today());
        self.initialized = true;
        self.persist()
    }

    /// Status-bar projection
    pub fn display_snapshot(&self) -> DisplaySnapshot {
        let progress = self.config.levels.progress(self.state.total_xp);
        DisplaySnapshot {
            level: progress.level,
            daily_xp: self.state.daily_xp,
            total_xp: self.state.total_xp,
            multiplier: self.state.multiplier,
            streak: self.state.streak,
            progress_percent: progress.progress_percent,
        }
    }

    /// Full stats projection
    pub fn stats_report(&self) -> StatsReport {
        let progress = self.config.levels.progress(self.state.total_xp);
        StatsReport {
            level: progress.level,
            max_level: self.config.levels.max_level,
            progress_percent: progress.progress_percent,
            xp_to_next: progress.xp_to_next,
            daily_xp: self.state.daily_xp,
            total_xp: self.state.total_xp,
            streak: self.state.streak,
            multiplier: self.state.multiplier,
            high_score: self.state.high_score,
            skill_points: self.state.skill_points,
            study_streak: self.state.study_streak,
            achievements_earned: ACHIEVEMENTS
                .iter()
                .filter(|a| self.state.has_achievement(a.id))
                .count(),
            achievements_total: ACHIEVEMENTS.len(),
            rules: self.config.xp,
        }
    }

    /// Every skill tree node with its current level
    pub fn skill_tree(&self) -> Vec<SkillStatus> {
        SKILL_TREE
            .iter()
            .map(|node| SkillStatus {
                node,
                level: skill_level(&self.state.skills, node.id),
                blocked_by: check_upgrade(&self.state.skills, self.state.skill_points, node.id)
                    .err(),
            })
            .collect()
    }

    /// Achievement list; unearned hidden entries are masked
    pub fn achievements(&self) -> Vec<AchievementStatus> {
        ACHIEVEMENTS
            .iter()
            .map(|a| {
                let record = self.state.achievements.get(a.id).filter(|r| r.earned);
                let masked = a.hidden && record.is_none();
                AchievementStatus {
                    id: a.id,
                    name: if masked { "???" } else { a.name },
                    description: if masked { "Hidden achievement" } else { a.description },
                    icon: if masked { "❔" } else { a.icon },
                    reward_xp: a.reward_xp,
                    earned: record.is_some(),
                    date: record.map(|r| r.date.clone()),
                }
            })
            .collect()
    }

    /// Archived daily XP, oldest first
    pub fn xp_history(&self) -> Vec<(String, i64)> {
        self.state
            .xp_history
            .iter()
            .map(|(date, xp)| (date.clone(), *xp))
            .collect()
    }
}
