//! State storage backends
//!
//! Full-record overwrite on every save; no partial writes.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::state::ProgressionState;
use crate::error::SaveError;

/// Durable home for the progression record
pub trait StateStore: Send {
    /// Read the stored record
    fn load(&self) -> Result<ProgressionState, SaveError>;

    /// Overwrite the stored record
    fn save(&mut self, state: &ProgressionState) -> Result<(), SaveError>;

    /// Human-readable location for logs
    fn location(&self) -> String;
}

/// Default state file location
pub fn default_state_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "reviewxp", "ReviewXP") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("state.json");
        path
    } else {
        PathBuf::from("./reviewxp_state.json")
    }
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform data directory
    pub fn at_default_location() -> Self {
        Self::new(default_state_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<ProgressionState, SaveError> {
        let data = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SaveError::NotFound(self.path.clone()),
            _ => SaveError::io(&self.path, e),
        })?;
        parse_state(&data)
    }

    fn save(&mut self, state: &ProgressionState) -> Result<(), SaveError> {
        // Ensure directory exists
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SaveError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(state)?;

        // Write beside the target, then swap it in
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| SaveError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| SaveError::io(&self.path, e))?;

        log::debug!("State saved to {:?}", self.path);
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory store holding the serialized record.
///
/// Clones share the same slot, so a test can keep a handle after giving
/// one to the engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    data: Option<String>,
    fail_saves: bool,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw record text
    pub fn with_raw(data: impl Into<String>) -> Self {
        let store = Self::new();
        store.inner.lock().data = Some(data.into());
        store
    }

    /// Raw text of the last successful save
    pub fn raw(&self) -> Option<String> {
        self.inner.lock().data.clone()
    }

    /// Make every following save fail with an IO error
    pub fn set_fail_saves(&self, fail: bool) {
        self.inner.lock().fail_saves = fail;
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.inner.lock().saves
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<ProgressionState, SaveError> {
        match &self.inner.lock().data {
            Some(data) => parse_state(data),
            None => Err(SaveError::NotFound(PathBuf::from("<memory>"))),
        }
    }

    fn save(&mut self, state: &ProgressionState) -> Result<(), SaveError> {
        let json = serde_json::to_string(state)?;
        let mut slot = self.inner.lock();
        if slot.fail_saves {
            return Err(SaveError::io(
                "<memory>",
                std::io::Error::new(ErrorKind::PermissionDenied, "store is read-only"),
            ));
        }
        slot.data = Some(json);
        slot.saves += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

fn parse_state(data: &str) -> Result<ProgressionState, SaveError> {
    serde_json::from_str(data).map_err(|e| SaveError::Corrupt(e.to_string()))
}
