// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Bytes;
use fhr_handle::TypeId;
use fhr_utils::Hexf;
use std::fmt;

/// Ciphertexts and their ZK proof as produced by the encryption library, opaque to the client
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedInput {
    pub ciphertext_with_proof: Bytes,
    /// Types of the packed values, in packing order
    pub type_ids: Vec<TypeId>,
    pub extra_data: Bytes,
}

impl EncryptedInput {
    pub fn new(ciphertext_with_proof: impl Into<Bytes>, type_ids: Vec<TypeId>) -> Self {
        Self {
            ciphertext_with_proof: ciphertext_with_proof.into(),
            type_ids,
            extra_data: Bytes::from_static(&[0x00]),
        }
    }

    pub fn with_extra_data(mut self, extra_data: impl Into<Bytes>) -> Self {
        self.extra_data = extra_data.into();
        self
    }
}

impl fmt::Debug for EncryptedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedInput")
            .field("ciphertext_with_proof", &Hexf(&self.ciphertext_with_proof))
            .field("type_ids", &self.type_ids)
            .field("extra_data", &Hexf(&self.extra_data))
            .finish()
    }
}
