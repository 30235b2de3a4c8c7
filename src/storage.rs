use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

use serde::Serialize;

use crate::error::StorageError;
use crate::models::PanelSettings;

const SETTINGS_FILE: &str = "private-secretary.json";

/// Settings persistence for the panel: one JSON document under the
/// host-provided data directory, namespaced by the panel's file name and
/// written atomically.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn ensure_dirs(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn load_settings(&self) -> Result<PanelSettings, StorageError> {
        let mut file = File::open(self.settings_path())?;
        let mut buf = String::new();
        file.read_to_string(&mut buf)?;
        Ok(serde_json::from_str(&buf)?)
    }

    pub fn save_settings(&self, settings: &PanelSettings) -> Result<(), StorageError> {
        self.write_atomic(self.settings_path(), settings)
    }

    fn write_atomic<T: Serialize>(&self, path: PathBuf, data: &T) -> Result<(), StorageError> {
        let temp_path = path.with_extension("tmp");
        let json = serde_json::to_vec_pretty(data)?;
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&json)?;
            file.sync_all()?;
        }
        fs::rename(temp_path, path)?;
        Ok(())
    }
}
