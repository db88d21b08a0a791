// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use std::fs;
use std::path::PathBuf;

use gas_station_core::reconcile::{self, Error};
use gas_station_core::store::{ConfigStore, Error as StoreError, FileStore, MemoryStore};
use gas_station_core::types::credential::{GasStationCredential, GAS_STATION_KEY};
use gas_station_core::CoinType;
use serde_json::{json, Value};

const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const COSMOS_INITIA: &str = "init19rl4cm2hmr8afy4kldpxz3fka4jguq0ajkdw5h";
const COSMOS_CELESTIA: &str = "celestia19rl4cm2hmr8afy4kldpxz3fka4jguq0ad2ud9c";

fn temp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("gas-station-{tag}-{}.json", std::process::id()))
}

/// Store whose backing medium rejects writes.
struct ReadOnlyStore(MemoryStore);

impl ConfigStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.0.get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.0.set(key, value)
    }

    fn write(&mut self) -> Result<(), StoreError> {
        Err(StoreError::Backend(String::from("read-only medium")))
    }
}

#[test]
fn setup_save_and_reload() {
    let path = temp_path("setup");
    let mut store = FileStore::open(&path).unwrap();

    let credential = GasStationCredential::recover(MNEMONIC).unwrap();
    reconcile::save(&mut store, &credential).unwrap();

    // a fresh process re-opens the file and loads without migration
    let mut reopened = FileStore::open(&path).unwrap();
    let loaded = reconcile::load(&mut reopened).unwrap();
    assert_eq!(loaded, credential);
    assert_eq!(loaded.coin_type(), Some(CoinType::Evm));

    fs::remove_file(&path).unwrap();
}

#[test]
fn legacy_file_is_migrated_on_disk() {
    let path = temp_path("legacy");
    let mut root = serde_json::Map::new();
    root.insert(
        GAS_STATION_KEY.to_string(),
        json!({
            "initia_address": COSMOS_INITIA,
            "celestia_address": COSMOS_CELESTIA,
            "mnemonic": MNEMONIC,
        }),
    );
    fs::write(&path, Value::Object(root).to_string()).unwrap();

    let mut store = FileStore::open(&path).unwrap();
    let credential = reconcile::load(&mut store).unwrap();
    assert_eq!(credential.coin_type(), Some(CoinType::Cosmos));
    assert_eq!(credential.initia_address(), COSMOS_INITIA);

    // the migrated tag reached the disk
    let content: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        content[GAS_STATION_KEY]["coin_type"].as_u64(),
        Some(118)
    );

    fs::remove_file(&path).unwrap();
}

#[test]
fn persistence_failure_leaves_reconciled_record_reusable() {
    let legacy =
        GasStationCredential::from_parts(COSMOS_INITIA, COSMOS_CELESTIA, MNEMONIC, None);

    let mut inner = MemoryStore::new();
    inner
        .set(GAS_STATION_KEY, serde_json::to_value(&legacy).unwrap())
        .unwrap();
    let mut store = ReadOnlyStore(inner);

    assert!(matches!(reconcile::load(&mut store), Err(Error::Store(_))));

    // the pure pass still reconciles; persistence alone can be retried
    // against a writable store
    let reconciled = reconcile::reconcile(&legacy).unwrap();
    assert!(reconciled.dirty);
    assert_eq!(reconciled.credential.coin_type(), Some(CoinType::Cosmos));

    let mut writable = MemoryStore::new();
    reconcile::save(&mut writable, &reconciled.credential).unwrap();
    assert_eq!(writable.writes(), 1);
    assert_eq!(reconcile::load(&mut writable).unwrap(), reconciled.credential);
    assert_eq!(writable.writes(), 1);
}
