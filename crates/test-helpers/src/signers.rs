// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::{
    primitives::{Address, Bytes, B256},
    signers::{local::PrivateKeySigner, SignerSync},
};

/// Deterministic local signers standing in for coprocessors, KMS nodes or users
#[derive(Debug, Clone)]
pub struct TestSigners {
    signers: Vec<PrivateKeySigner>,
}

impl TestSigners {
    pub fn new(count: usize) -> Self {
        Self::with_seed(0x11, count)
    }

    /// Sets built from different seeds share no keys
    pub fn with_seed(seed: u8, count: usize) -> Self {
        let signers = (0..count)
            .map(|i| {
                let mut key = [seed.clamp(1, 0xfe); 32];
                key[28..].copy_from_slice(&(i as u32 + 1).to_be_bytes());
                PrivateKeySigner::from_bytes(&B256::from(key)).expect("valid test key")
            })
            .collect();
        Self { signers }
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    pub fn signer(&self, index: usize) -> &PrivateKeySigner {
        &self.signers[index]
    }

    pub fn address(&self, index: usize) -> Address {
        self.signers[index].address()
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.signers.iter().map(|s| s.address()).collect()
    }

    pub fn checksummed(&self) -> Vec<String> {
        self.addresses()
            .iter()
            .map(|a| a.to_checksum(None))
            .collect()
    }

    /// 65-byte `r ‖ s ‖ v` signature over a prehashed digest
    pub fn sign_hash(&self, index: usize, hash: &B256) -> Bytes {
        sign_with(&self.signers[index], hash)
    }

    pub fn sign_by(&self, indices: &[usize], hash: &B256) -> Vec<Bytes> {
        indices.iter().map(|&i| self.sign_hash(i, hash)).collect()
    }
}

pub fn sign_with(signer: &PrivateKeySigner, hash: &B256) -> Bytes {
    let signature = signer.sign_hash_sync(hash).expect("local signing succeeds");
    Bytes::from(signature.as_bytes().to_vec())
}

pub fn outsider() -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::repeat_byte(0x42)).expect("valid test key")
}
