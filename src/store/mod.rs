// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! Configuration store
//!
//! The credential record is persisted as a JSON value inside an external
//! key-value configuration store. The reconciler only ever talks to this
//! trait; callers plug in whatever backing the setup tool uses.

use serde_json::Value;

pub mod file;
pub mod memory;

pub use self::file::FileStore;
pub use self::memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("Store backend: {0}")]
    Backend(String),
}

pub trait ConfigStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Value>, Error>;

    /// Stage `value` under `key`.
    fn set(&mut self, key: &str, value: Value) -> Result<(), Error>;

    /// Flush staged values to the backing medium.
    fn write(&mut self) -> Result<(), Error>;
}
