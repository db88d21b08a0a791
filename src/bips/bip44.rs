// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! BIP44
//!
//! <https://github.com/bitcoin/bips/blob/master/bip-0044.mediawiki>

use core::fmt;

use serde::{Deserialize, Serialize};

use super::bip32::{ChildNumber, DerivationPath};

pub const PURPOSE: u32 = 44;

#[derive(Debug, PartialEq, Eq)]
pub struct UnsupportedCoinTypeError(pub u32);

impl std::error::Error for UnsupportedCoinTypeError {}

impl fmt::Display for UnsupportedCoinTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` coin type is not supported", self.0)
    }
}

/// BIP44 registry index selecting which derivation and address convention
/// a chain uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(u32)]
pub enum CoinType {
    /// EVM-style derivation (ex. `init` addresses on newer records)
    Evm = 60,
    /// Cosmos-style derivation (`celestia` and legacy `init` addresses)
    Cosmos = 118,
}

impl CoinType {
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }
}

impl From<CoinType> for u32 {
    fn from(coin: CoinType) -> Self {
        coin.as_u32()
    }
}

impl TryFrom<u32> for CoinType {
    type Error = UnsupportedCoinTypeError;

    fn try_from(coin: u32) -> Result<Self, Self::Error> {
        match coin {
            60 => Ok(Self::Evm),
            118 => Ok(Self::Cosmos),
            other => Err(UnsupportedCoinTypeError(other)),
        }
    }
}

impl fmt::Display for CoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Gas station account path: `m/44'/<coin>'/0'/0/0`
pub fn gas_station_path(coin: CoinType) -> DerivationPath {
    DerivationPath::from(vec![
        ChildNumber::Hardened { index: PURPOSE },
        ChildNumber::Hardened {
            index: coin.as_u32(),
        },
        ChildNumber::Hardened { index: 0 },
        ChildNumber::Normal { index: 0 },
        ChildNumber::Normal { index: 0 },
    ])
}
