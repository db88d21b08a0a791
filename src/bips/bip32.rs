// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! BIP32
//!
//! <https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki>

use core::fmt;

pub use bitcoin::bip32::{ChildNumber, DerivationPath, ExtendedPrivKey};
use bitcoin::secp256k1::{Secp256k1, Signing};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Master key construction failed (all-zero HMAC key class)
    MasterKey(bitcoin::bip32::Error),
    /// A child key step failed
    ChildKey(bitcoin::bip32::Error),
    /// A path segment is not a decimal index in range
    InvalidPathSegment { segment: String },
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MasterKey(e) => write!(f, "Master key derivation: {e}"),
            Self::ChildKey(e) => write!(f, "Child key derivation: {e}"),
            Self::InvalidPathSegment { segment } => {
                write!(f, "Invalid derivation path segment: `{segment}`")
            }
        }
    }
}

pub trait Bip32 {
    type Err;

    fn to_bip32_root_key(&self) -> Result<ExtendedPrivKey, Self::Err>;
}

/// Parse a human-readable derivation path (ex. `m/44'/118'/0'/0/0`).
///
/// The leading `m` marker is required. A trailing `'` marks a hardened
/// segment. Any segment that does not parse as an in-range decimal index
/// fails with [`Error::InvalidPathSegment`].
pub fn parse_path<S>(path: S) -> Result<DerivationPath, Error>
where
    S: AsRef<str>,
{
    let path: &str = path.as_ref();
    let mut segments = path.trim().split('/');

    match segments.next() {
        Some("m") => (),
        segment => {
            return Err(Error::InvalidPathSegment {
                segment: segment.unwrap_or_default().to_string(),
            })
        }
    }

    let mut children: Vec<ChildNumber> = Vec::new();
    for segment in segments {
        let (index, hardened) = match segment.strip_suffix('\'') {
            Some(index) => (index, true),
            None => (segment, false),
        };
        let index: u32 = index.parse().map_err(|_| Error::InvalidPathSegment {
            segment: segment.to_string(),
        })?;
        let child: ChildNumber = if hardened {
            ChildNumber::from_hardened_idx(index)
        } else {
            ChildNumber::from_normal_idx(index)
        }
        .map_err(|_| Error::InvalidPathSegment {
            segment: segment.to_string(),
        })?;
        children.push(child);
    }

    Ok(DerivationPath::from(children))
}

/// Apply the child key steps of `path` to `root`, left to right.
pub fn derive_priv<C>(
    secp: &Secp256k1<C>,
    root: &ExtendedPrivKey,
    path: &DerivationPath,
) -> Result<ExtendedPrivKey, Error>
where
    C: Signing,
{
    root.derive_priv(secp, path).map_err(Error::ChildKey)
}
