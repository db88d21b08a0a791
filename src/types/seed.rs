// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use core::fmt;

use bip39::Mnemonic;
use bitcoin::Network;

use crate::bips::bip32::{self, Bip32, ExtendedPrivKey};

#[derive(Clone, Eq, PartialEq)]
pub struct Seed {
    mnemonic: Mnemonic,
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<sensitive>")
    }
}

impl Drop for Seed {
    fn drop(&mut self) {
        self.mnemonic = Mnemonic::from_entropy(b"00000000000000000000000000000000").unwrap();
    }
}

impl Seed {
    pub fn from_mnemonic(mnemonic: Mnemonic) -> Self {
        Self { mnemonic }
    }

    pub fn mnemonic(&self) -> Mnemonic {
        self.mnemonic.clone()
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        self.mnemonic.to_seed("")
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl Bip32 for Seed {
    type Err = bip32::Error;

    fn to_bip32_root_key(&self) -> Result<ExtendedPrivKey, Self::Err> {
        // The network tag only affects xprv serialization, which never
        // leaves the derivation layer.
        ExtendedPrivKey::new_master(Network::Bitcoin, &self.to_bytes())
            .map_err(bip32::Error::MasterKey)
    }
}
