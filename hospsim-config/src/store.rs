//! File-backed key-value store holding one JSON document per key.
//!
//! Reads never fail: a missing or malformed document is treated as absent.
//! Writes replace the whole document (last write wins).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ConfigError, Result};

pub mod keys {
    pub const ELEVATOR_CONFIGS: &str = "elevator-configs";
    pub const LAB_FLOW_TEMPLATES: &str = "flowTemplates";
    pub const ELEVATOR_FLOW_TEMPLATES: &str = "elevatorFlowTemplates";
    pub const LAB_FLOW_CONFIG: &str = "labFlowConfig";
    pub const ELEVATOR_FLOW_CONFIG: &str = "elevatorFlowConfig";
    pub const SPECIAL_WINDOW_TYPES: &str = "specialWindowTypes";
    pub const WINDOW_CONFIGS: &str = "windowConfigs";
    pub const TEMPORARY_WINDOWS: &str = "temporaryWindows";
    pub const PATIENT_TYPE_RATIOS: &str = "patientTypeRatios";
    pub const SIMULATION_HISTORY: &str = "simulationHistory";
}

#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Opens (and creates if needed) the directory backing the store.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| ConfigError::Storage {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    /// Loads the document under `key`, or `None` when it is missing or unreadable.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored document, ignoring");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "malformed stored document, ignoring");
                None
            }
        }
    }

    /// Loads a stored array, falling back to an empty list.
    pub fn load_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.load(key).unwrap_or_default()
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let body = serde_json::to_vec_pretty(value).map_err(|source| ConfigError::Encode {
            key: key.to_string(),
            source,
        })?;

        // Write next to the target and rename so readers never see half a document.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|source| ConfigError::Storage {
                key: key.to_string(),
                source,
            })?;

        tracing::debug!(key, "stored document");
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ConfigError::Storage {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
