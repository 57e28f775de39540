//! Save/load system
//!
//! The progression record and where it is stored.

pub mod state;
pub mod store;

pub use state::{AchievementRecord, ProgressionState, DATE_FORMAT};
pub use store::{default_state_path, JsonFileStore, MemoryStore, StateStore};
