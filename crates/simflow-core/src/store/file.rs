//! JSON-file backed store.
//!
//! The file holds one flat JSON object of string values. Writes go to a temp
//! file that is renamed over the original so readers never see a partial file.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::KeyValueStore;

/// Store persisted as a JSON object on disk
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by `path`; nothing is touched until the first access
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Default location: `<data_dir>/simflow/store.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("simflow").join("store.json"))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store file: {:?}", self.path))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse store file: {:?}", self.path))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create store directory: {:?}", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(entries).context("Failed to serialize store")?;
        let temp_path = self.path.with_extension("tmp");

        // Leftover from an interrupted write
        let _ = fs::remove_file(&temp_path);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .with_context(|| format!("Failed to create temp store file: {:?}", temp_path))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write temp store file: {:?}", temp_path))?;
        file.sync_all()
            .with_context(|| format!("Failed to sync temp store file: {:?}", temp_path))?;

        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to rename store file: {:?}", self.path))?;

        debug!("Saved {} store entries to {:?}", entries.len(), self.path);
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Discarding unreadable store contents: {:#}", e);
                BTreeMap::new()
            }
        };
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }
}
