// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use core::fmt;
use core::str::FromStr;

use bitcoin::secp256k1::Secp256k1;
use serde::{Deserialize, Serialize};

use super::{Seed, WordCount};
use crate::address;
use crate::bips::bip32::{self, Bip32};
use crate::bips::bip39::{self, Mnemonic};
use crate::bips::bip44::{self, CoinType};

/// Key the credential record is persisted under in the configuration store.
pub const GAS_STATION_KEY: &str = "common.gas_station";

pub const INITIA_HRP: &str = "init";
pub const CELESTIA_HRP: &str = "celestia";

#[derive(Debug, PartialEq)]
pub enum Error {
    BIP32(bip32::Error),
    BIP39(bip39::Error),
    Address(address::Error),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BIP32(e) => write!(f, "BIP32: {e}"),
            Self::BIP39(e) => write!(f, "BIP39: {e}"),
            Self::Address(e) => write!(f, "Address: {e}"),
        }
    }
}

impl From<bip32::Error> for Error {
    fn from(e: bip32::Error) -> Self {
        Self::BIP32(e)
    }
}

impl From<bip39::Error> for Error {
    fn from(e: bip39::Error) -> Self {
        Self::BIP39(e)
    }
}

impl From<address::Error> for Error {
    fn from(e: address::Error) -> Self {
        Self::Address(e)
    }
}

/// Derive the gas station account address for `coin_type` under `hrp`.
pub fn derive_address(seed: &Seed, coin_type: CoinType, hrp: &str) -> Result<String, Error> {
    let secp = Secp256k1::new();
    let root = seed.to_bip32_root_key()?;
    let path = bip44::gas_station_path(coin_type);
    let key = bip32::derive_priv(&secp, &root, &path)?;
    Ok(address::from_derived_key(&secp, &key, hrp)?)
}

/// Operator-held keypair funding automated on-chain operations on both
/// chains from one mnemonic.
///
/// `coin_type` is absent on records written before it was tracked; the
/// reconciler resolves and backfills it on load.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasStationCredential {
    initia_address: String,
    celestia_address: String,
    mnemonic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coin_type: Option<CoinType>,
}

impl fmt::Debug for GasStationCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<sensitive>")
    }
}

impl GasStationCredential {
    /// Build a fresh record from `mnemonic`.
    ///
    /// New records derive the Initia address with coin type 60; the
    /// Celestia address is always Cosmos-style.
    pub fn new(mnemonic: Mnemonic) -> Result<Self, Error> {
        let seed = Seed::from_mnemonic(mnemonic.clone());
        Ok(Self {
            initia_address: derive_address(&seed, CoinType::Evm, INITIA_HRP)?,
            celestia_address: derive_address(&seed, CoinType::Cosmos, CELESTIA_HRP)?,
            mnemonic: mnemonic.to_string(),
            coin_type: Some(CoinType::Evm),
        })
    }

    /// Generate a record from a freshly gathered mnemonic.
    pub fn generate(word_count: WordCount) -> Result<Self, Error> {
        let entropy: Vec<u8> = bip39::entropy(word_count, None);
        let mnemonic = Mnemonic::from_entropy(&entropy)?;
        Self::new(mnemonic)
    }

    /// Rebuild a record from an operator-supplied phrase.
    pub fn recover<S>(phrase: S) -> Result<Self, Error>
    where
        S: AsRef<str>,
    {
        let mnemonic = Mnemonic::from_str(phrase.as_ref())?;
        Self::new(mnemonic)
    }

    /// Assemble a record from already-persisted parts.
    pub fn from_parts<S>(
        initia_address: S,
        celestia_address: S,
        mnemonic: S,
        coin_type: Option<CoinType>,
    ) -> Self
    where
        S: Into<String>,
    {
        Self {
            initia_address: initia_address.into(),
            celestia_address: celestia_address.into(),
            mnemonic: mnemonic.into(),
            coin_type,
        }
    }

    pub fn initia_address(&self) -> &str {
        &self.initia_address
    }

    pub fn celestia_address(&self) -> &str {
        &self.celestia_address
    }

    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn coin_type(&self) -> Option<CoinType> {
        self.coin_type
    }

    /// Parse the stored phrase into a [`Seed`].
    pub fn seed(&self) -> Result<Seed, Error> {
        let mnemonic = Mnemonic::from_str(&self.mnemonic)?;
        Ok(Seed::from_mnemonic(mnemonic))
    }

    pub(crate) fn set_initia_address(&mut self, address: String) {
        self.initia_address = address;
    }

    pub(crate) fn set_celestia_address(&mut self, address: String) {
        self.celestia_address = address;
    }

    pub(crate) fn set_coin_type(&mut self, coin_type: CoinType) {
        self.coin_type = Some(coin_type);
    }
}
