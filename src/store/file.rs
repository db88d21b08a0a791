// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{ConfigStore, Error};

/// Store backed by a single JSON object file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl FileStore {
    /// Open `path`, loading existing values. A missing file is an empty
    /// store until the first `write`.
    pub fn open<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let path: PathBuf = path.as_ref().to_path_buf();
        let values: Map<String, Value> = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            Map::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, Error> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), Error> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn write(&mut self) -> Result<(), Error> {
        fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        log::debug!("configuration written to {}", self.path.display());
        Ok(())
    }
}
