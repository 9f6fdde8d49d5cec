// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{Address, Bytes, U256};
use anyhow::Result;
use fhr_handle::Handle;

/// A re-encrypted share whose KMS signature has been checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedShare {
    pub signer: Address,
    pub payload: Bytes,
    pub extra_data: Bytes,
}

/// Recombines verified KMS shares into cleartexts with the user's private key.
///
/// Returns one word per handle, in handle order.
pub trait ShareDecryptor: Send + Sync {
    fn reconstruct(&self, handles: &[Handle], shares: &[VerifiedShare]) -> Result<Vec<U256>>;
}
