// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use serde_json::{Map, Value};

use super::{ConfigStore, Error};

/// In-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Map<String, Value>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `write` calls performed so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, Error> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), Error> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn write(&mut self) -> Result<(), Error> {
        self.writes += 1;
        Ok(())
    }
}
