//! Error types
//!
//! Storage failures, corrupt records, bad grades and rejected skill purchases.

use std::path::PathBuf;

use thiserror::Error;

/// Persistence failures
#[derive(Debug, Error)]
pub enum SaveError {
    /// No state has been stored yet
    #[error("no saved state at {0:?}")]
    NotFound(PathBuf),
    /// Storage could not be read or written
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Record parsed badly or failed validation
    #[error("corrupt state: {0}")]
    Corrupt(String),
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SaveError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SaveError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Reasons a skill upgrade is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkillError {
    #[error("unknown skill '{0}'")]
    UnknownSkill(String),
    #[error("{0} is already at max level")]
    MaxLevel(&'static str),
    #[error("requires {skill} level {level}")]
    PrerequisiteNotMet { skill: &'static str, level: u32 },
    #[error("not enough skill points: need {needed}, have {available}")]
    NotEnoughPoints { needed: u32, available: u32 },
}

/// Top-level engine error
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Persistence(#[from] SaveError),
    #[error("invalid grade {0}: expected 1 (again) to 4 (easy)")]
    InvalidGrade(u8),
    #[error(transparent)]
    Skill(#[from] SkillError),
}
