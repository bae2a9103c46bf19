use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use gravity_grid_core::{MemoryStore, SettingsStore};

/// Key-value store flushed to a JSON file, or kept in memory when no path is given.
#[derive(Clone, Debug, Default)]
pub struct FileStore {
    path: Option<PathBuf>,
    values: MemoryStore,
}

impl FileStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let values = if path.exists() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Could not read save file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Corrupt save file {}", path.display()))?
        } else {
            log::info!("No save file at {}, starting fresh", path.display());
            MemoryStore::new()
        };
        Ok(Self {
            path: Some(path.to_owned()),
            values,
        })
    }

    pub fn flush(&self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = serde_json::to_string_pretty(&self.values)?;
        fs::write(path, text).with_context(|| format!("Could not write save file {}", path.display()))?;
        log::debug!("Saved {} entries to {}", self.values.len(), path.display());
        Ok(())
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.set(key, value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}
