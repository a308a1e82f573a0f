//! Key/value stores for state that must outlive a single phase process.
//!
//! The workflow runner hands saved values back to later phases as `STATE_<key>`
//! environment variables; this module only covers the write side.

use crate::error::{DeploymentError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Write side of the cross-phase key/value store
pub trait StateStore {
    /// Persist `value` under `key` for later phases
    fn save_state(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store backed by the workflow runner's state file protocol
#[derive(Debug, Clone)]
pub struct RunnerStateStore {
    /// File named by `GITHUB_STATE`; `None` selects the legacy stdout command
    state_file_path: Option<PathBuf>,
}

impl RunnerStateStore {
    /// Create a store writing to the given state file
    pub fn new<P: AsRef<Path>>(state_file_path: P) -> Self {
        Self {
            state_file_path: Some(state_file_path.as_ref().to_path_buf()),
        }
    }

    /// Create a store that emits `::save-state` commands on stdout
    pub fn legacy() -> Self {
        Self {
            state_file_path: None,
        }
    }

    /// Pick the protocol from the environment (`GITHUB_STATE` when available)
    pub fn from_env(env: &crate::env::EnvConfig) -> Self {
        match env.get("GITHUB_STATE") {
            Some(path) => Self::new(path),
            None => Self::legacy(),
        }
    }

    fn append_record(path: &Path, key: &str, value: &str) -> Result<()> {
        let delimiter = unique_delimiter();
        if key.contains(&delimiter) || value.contains(&delimiter) {
            return Err(DeploymentError::StateSave {
                key: key.to_string(),
                reason: "value collides with the record delimiter".to_string(),
            });
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| DeploymentError::StateSave {
                key: key.to_string(),
                reason: format!("Failed to open state file {}: {}", path.display(), e),
            })?;

        write!(file, "{key}<<{delimiter}\n{value}\n{delimiter}\n").map_err(|e| {
            DeploymentError::StateSave {
                key: key.to_string(),
                reason: format!("Failed to write state file {}: {}", path.display(), e),
            }
        })
    }
}

impl StateStore for RunnerStateStore {
    fn save_state(&mut self, key: &str, value: &str) -> Result<()> {
        log::debug!("Saving state {key}={value}");
        match &self.state_file_path {
            Some(path) => Self::append_record(path, key, value),
            None => {
                println!("::save-state name={key}::{value}");
                Ok(())
            }
        }
    }
}

fn unique_delimiter() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("ghadelimiter_{}_{}", std::process::id(), nanos)
}

/// In-process store, used by tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    records: Vec<(String, String)>,
}

impl MemoryStateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write in order
    pub fn records(&self) -> &[(String, String)] {
        &self.records
    }

    /// Latest value written for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.records
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl StateStore for MemoryStateStore {
    fn save_state(&mut self, key: &str, value: &str) -> Result<()> {
        self.records.push((key.to_string(), value.to_string()));
        Ok(())
    }
}
