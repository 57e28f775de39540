//! ReviewXP - progression engine for flashcard reviews
//!
//! Turns again/hard/good/easy answers into XP, a streak multiplier,
//! levels, skill points, skill tree bonuses and achievements.

pub mod config;
pub mod engine;
pub mod error;
pub mod progression;
pub mod save;

// Re-export commonly used types
pub use config::{EngineConfig, XpRules};
pub use engine::{Engine, Grade, GradeOutcome, Notification};
pub use error::{EngineError, SaveError, SkillError};
pub use progression::{level_for, LevelProgress};
pub use save::{JsonFileStore, MemoryStore, ProgressionState, StateStore};
