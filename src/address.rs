// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! Bech32 account addresses
//!
//! <https://github.com/bitcoin/bips/blob/master/bip-0173.mediawiki>

use core::fmt;

use bech32::{FromBase32, ToBase32, Variant};
use bitcoin::hashes::{hash160, Hash};
use bitcoin::secp256k1::{Secp256k1, Signing};

use crate::bips::bip32::ExtendedPrivKey;

/// Frame for account addresses (20-byte public key hash)
const SHORT_FRAME: usize = 20;
/// Frame for wide payloads (ex. consensus public keys)
const WIDE_FRAME: usize = 32;

#[derive(Debug, PartialEq)]
pub enum Error {
    Bech32(bech32::Error),
    Hex(hex::FromHexError),
    /// Raw payload too large for the wide frame
    InvalidInputLength(usize),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bech32(e) => write!(f, "Bech32: {e}"),
            Self::Hex(e) => write!(f, "Hex: {e}"),
            Self::InvalidInputLength(len) => {
                write!(f, "Invalid public key length: {len} bytes")
            }
        }
    }
}

impl From<bech32::Error> for Error {
    fn from(e: bech32::Error) -> Self {
        Self::Bech32(e)
    }
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Self::Hex(e)
    }
}

/// Encode the account address of a derived key.
///
/// The compressed public key is hashed with SHA256 then RIPEMD160 and the
/// 20-byte result is bech32-encoded under `hrp`.
pub fn from_derived_key<C>(
    secp: &Secp256k1<C>,
    key: &ExtendedPrivKey,
    hrp: &str,
) -> Result<String, Error>
where
    C: Signing,
{
    let public_key: [u8; 33] = key.private_key.public_key(secp).serialize();
    let hash: [u8; 20] = hash160::Hash::hash(&public_key).to_byte_array();
    encode(hrp, &hash)
}

/// Encode an externally supplied public key byte string.
///
/// Accepts hex with an optional `0x` prefix, upper or lower case. Payloads
/// up to 20 bytes are left-padded with zeros to the 20-byte frame; payloads
/// of 21 to 32 bytes are left-padded to the 32-byte frame. Longer payloads
/// fail with [`Error::InvalidInputLength`]; odd-length or non-hex input
/// fails with [`Error::Hex`].
pub fn from_raw_public_key<S>(public_key: S, hrp: &str) -> Result<String, Error>
where
    S: AsRef<str>,
{
    let public_key: &str = public_key.as_ref().trim();
    let public_key: &str = public_key
        .strip_prefix("0x")
        .or_else(|| public_key.strip_prefix("0X"))
        .unwrap_or(public_key);
    let bytes: Vec<u8> = hex::decode(public_key)?;
    let payload: Vec<u8> = pad_frame(bytes)?;
    encode(hrp, &payload)
}

/// Bech32-encode `payload` under `hrp`.
pub fn encode(hrp: &str, payload: &[u8]) -> Result<String, Error> {
    Ok(bech32::encode(hrp, payload.to_base32(), Variant::Bech32)?)
}

/// Decode a bech32 address back to its human-readable prefix and payload.
pub fn decode<S>(address: S) -> Result<(String, Vec<u8>), Error>
where
    S: AsRef<str>,
{
    let (hrp, data, _variant) = bech32::decode(address.as_ref())?;
    Ok((hrp, Vec::<u8>::from_base32(&data)?))
}

fn pad_frame(mut bytes: Vec<u8>) -> Result<Vec<u8>, Error> {
    let frame: usize = match bytes.len() {
        0..=SHORT_FRAME => SHORT_FRAME,
        len if len <= WIDE_FRAME => WIDE_FRAME,
        len => return Err(Error::InvalidInputLength(len)),
    };
    let mut payload: Vec<u8> = vec![0u8; frame - bytes.len()];
    payload.append(&mut bytes);
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLIC_KEY_HASH: &str = "932d1475bbad306322a839238d56fe5dc9184744";

    #[test]
    fn test_from_raw_public_key() {
        assert_eq!(
            from_raw_public_key(PUBLIC_KEY_HASH, "init").unwrap(),
            "init1jvk3gadm45cxxg4g8y3c64h7thy3s36yat0ezy"
        );
    }

    #[test]
    fn test_from_raw_public_key_prefix_and_case_invariance() {
        let plain = from_raw_public_key(PUBLIC_KEY_HASH, "init").unwrap();
        let prefixed = from_raw_public_key(format!("0x{PUBLIC_KEY_HASH}"), "init").unwrap();
        let upper = from_raw_public_key(PUBLIC_KEY_HASH.to_uppercase(), "init").unwrap();
        let both = from_raw_public_key(format!("0X{}", PUBLIC_KEY_HASH.to_uppercase()), "init")
            .unwrap();
        assert_eq!(plain, prefixed);
        assert_eq!(plain, upper);
        assert_eq!(plain, both);
    }

    #[test]
    fn test_padding_boundary() {
        // 20 bytes: encoded unchanged
        let (hrp, payload) =
            decode(from_raw_public_key(PUBLIC_KEY_HASH, "init").unwrap()).unwrap();
        assert_eq!(hrp, "init");
        assert_eq!(payload, hex::decode(PUBLIC_KEY_HASH).unwrap());

        // 21 bytes: left-padded to the 32-byte frame
        let wide = format!("01{PUBLIC_KEY_HASH}");
        assert_eq!(
            from_raw_public_key(&wide, "init").unwrap(),
            "init1qqqqqqqqqqqqqqqqqqqextg5wka66vrry25rjgud2ml9mjgcgazqkg9358"
        );
        let (_, payload) = decode(from_raw_public_key(&wide, "init").unwrap()).unwrap();
        assert_eq!(payload.len(), 32);
        assert_eq!(&payload[..11], &[0u8; 11]);

        // short input: left-padded to the 20-byte frame
        assert_eq!(
            from_raw_public_key("deadbeef", "init").unwrap(),
            "init1qqqqqqqqqqqqqqqqqqqqqqqqqr02m0h0skhr50"
        );

        // 32 bytes: fills the wide frame exactly
        let max = "11".repeat(32);
        let (_, payload) = decode(from_raw_public_key(&max, "init").unwrap()).unwrap();
        assert_eq!(payload, vec![0x11; 32]);

        // 33 bytes: no frame fits
        assert_eq!(
            from_raw_public_key("22".repeat(33), "init"),
            Err(Error::InvalidInputLength(33))
        );
    }

    #[test]
    fn test_malformed_hex() {
        // odd number of digits must never be silently truncated
        assert!(matches!(
            from_raw_public_key("0x123", "init"),
            Err(Error::Hex(hex::FromHexError::OddLength))
        ));
        assert!(matches!(
            from_raw_public_key(format!("1{PUBLIC_KEY_HASH}"), "init"),
            Err(Error::Hex(hex::FromHexError::OddLength))
        ));
        assert!(matches!(
            from_raw_public_key("93zz1475", "init"),
            Err(Error::Hex(hex::FromHexError::InvalidHexCharacter { .. }))
        ));
    }

    #[test]
    fn test_round_trip() {
        let payload: Vec<u8> = hex::decode(PUBLIC_KEY_HASH).unwrap();
        let address = encode("celestia", &payload).unwrap();
        let (hrp, decoded) = decode(address).unwrap();
        assert_eq!(hrp, "celestia");
        assert_eq!(decoded, payload);
    }
}
