// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! Credential reconciliation
//!
//! Runs on every credential load: resolves which coin type produced the
//! stored Initia address, refreshes the Celestia address and persists the
//! record only when something changed. A second pass over an unchanged
//! record performs zero writes.
//!
//! The read-modify-write against the store is not atomic; callers must
//! serialize concurrent loads of the same record.

use core::fmt;

use crate::bips::bip44::CoinType;
use crate::store::{self, ConfigStore};
use crate::types::credential::{
    self, derive_address, GasStationCredential, CELESTIA_HRP, GAS_STATION_KEY, INITIA_HRP,
};
use crate::types::Seed;

#[derive(Debug)]
pub enum Error {
    Credential(credential::Error),
    Store(store::Error),
    Json(serde_json::Error),
    /// No record stored under the gas station key
    NotConfigured,
    /// Coin type still unresolved after reconciliation
    UnconfiguredCoinType,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credential(e) => write!(f, "Credential: {e}"),
            Self::Store(e) => write!(f, "Persistence: {e}"),
            Self::Json(e) => write!(f, "Json: {e}"),
            Self::NotConfigured => write!(f, "Gas station credential not configured"),
            Self::UnconfiguredCoinType => write!(
                f,
                "Coin type could not be determined: the stored address matches no supported derivation scheme"
            ),
        }
    }
}

impl From<credential::Error> for Error {
    fn from(e: credential::Error) -> Self {
        Self::Credential(e)
    }
}

impl From<store::Error> for Error {
    fn from(e: store::Error) -> Self {
        Self::Store(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// How the coin type of a loaded record was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Record was already tagged
    AlreadyTagged(CoinType),
    /// Untagged record with no stored Initia address: nothing to probe,
    /// defaults to the legacy Cosmos coin type
    NeverDerived,
    /// Untagged record whose stored Initia address matched a probed
    /// candidate
    LegacyResolved(CoinType),
    /// Untagged record whose stored Initia address matched no candidate;
    /// the coin type is left unset rather than guessed
    LegacyAmbiguous,
}

impl Resolution {
    pub fn coin_type(&self) -> Option<CoinType> {
        match self {
            Self::AlreadyTagged(coin_type) | Self::LegacyResolved(coin_type) => Some(*coin_type),
            Self::NeverDerived => Some(CoinType::Cosmos),
            Self::LegacyAmbiguous => None,
        }
    }
}

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub credential: GasStationCredential,
    pub dirty: bool,
    pub resolution: Resolution,
}

/// Reconcile a loaded record without touching any store.
///
/// Pure: returns the (possibly migrated) record plus a dirty flag instead
/// of mutating shared state, so running it twice always reaches a fixed
/// point on the first pass.
pub fn reconcile(credential: &GasStationCredential) -> Result<Reconciliation, Error> {
    let seed: Seed = credential.seed()?;
    let mut next: GasStationCredential = credential.clone();
    let mut dirty: bool = false;

    let resolution: Resolution = match credential.coin_type() {
        Some(coin_type) => Resolution::AlreadyTagged(coin_type),
        None if credential.initia_address().is_empty() => {
            next.set_coin_type(CoinType::Cosmos);
            dirty = true;
            Resolution::NeverDerived
        }
        None => match probe_coin_type(&seed, credential.initia_address())? {
            Some(coin_type) => {
                next.set_coin_type(coin_type);
                dirty = true;
                Resolution::LegacyResolved(coin_type)
            }
            None => Resolution::LegacyAmbiguous,
        },
    };
    log::debug!("gas station coin type resolution: {resolution:?}");

    if let Some(coin_type) = next.coin_type() {
        let initia: String = derive_address(&seed, coin_type, INITIA_HRP)?;
        if next.initia_address().is_empty() {
            next.set_initia_address(initia);
            dirty = true;
        } else if next.initia_address() != initia {
            // Never clobber an address already matched under another scheme
            log::warn!(
                "stored initia address {} does not re-derive under coin type {coin_type}; keeping stored value",
                next.initia_address()
            );
        }

        let celestia: String = derive_address(&seed, CoinType::Cosmos, CELESTIA_HRP)?;
        if next.celestia_address() != celestia {
            next.set_celestia_address(celestia);
            dirty = true;
        }
    }

    Ok(Reconciliation {
        credential: next,
        dirty,
        resolution,
    })
}

fn probe_coin_type(seed: &Seed, stored: &str) -> Result<Option<CoinType>, Error> {
    // newer records derive with coin type 60; probe it first
    for coin_type in [CoinType::Evm, CoinType::Cosmos] {
        if derive_address(seed, coin_type, INITIA_HRP)? == stored {
            return Ok(Some(coin_type));
        }
    }
    Ok(None)
}

/// Load the persisted record, reconcile it, persist it back when dirty and
/// validate that the coin type is resolved.
pub fn load<S>(store: &mut S) -> Result<GasStationCredential, Error>
where
    S: ConfigStore,
{
    let value = store.get(GAS_STATION_KEY)?.ok_or(Error::NotConfigured)?;
    let stored: GasStationCredential = serde_json::from_value(value)?;

    let Reconciliation {
        credential,
        dirty,
        resolution,
    } = reconcile(&stored)?;

    if dirty {
        log::info!("migrating gas station credential ({resolution:?})");
        save(store, &credential)?;
    }

    // a record with an ambiguous derivation scheme is unusable for any
    // operation requiring address derivation
    if credential.coin_type().is_none() {
        return Err(Error::UnconfiguredCoinType);
    }

    Ok(credential)
}

/// Persist `credential` through the store.
pub fn save<S>(store: &mut S, credential: &GasStationCredential) -> Result<(), Error>
where
    S: ConfigStore,
{
    store.set(GAS_STATION_KEY, serde_json::to_value(credential)?)?;
    store.write()?;
    Ok(())
}
