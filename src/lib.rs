// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

#![doc = include_str!("../README.md")]

pub extern crate bip39;
pub extern crate bitcoin;
pub use bitcoin::hashes;
pub use bitcoin::secp256k1;

pub mod address;
pub mod bips;
pub mod reconcile;
pub mod store;
pub mod types;
pub mod util;

pub use self::bips::bip44::CoinType;
pub use self::store::ConfigStore;
pub use self::types::{GasStationCredential, Seed, WordCount};

pub type Result<T, E = Box<dyn std::error::Error>> = std::result::Result<T, E>;
