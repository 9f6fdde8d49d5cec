// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    Handle, HandleError, TypeId, CHAIN_ID_BYTES, FINALIZED_INDEX, HANDLE_HASH_LEN, HANDLE_LEN,
    INDEX_BYTE, TYPE_ID_BYTE, VERSION_BYTE,
};
use alloy::primitives::{keccak256, Address, B256, U256};

/// Domain separator for the hash of the whole ciphertext blob
pub const RAW_CT_HASH_DOMAIN_SEPARATOR: &[u8] = b"ZK-w_rct";
/// Domain separator for the per-value handle hash
pub const HANDLE_HASH_DOMAIN_SEPARATOR: &[u8] = b"ZK-w_hdl";
/// Indices 0..=254 are positional, 255 is reserved for finalized handles
pub const MAX_VALUES_PER_INPUT: usize = FINALIZED_INDEX as usize;

pub fn hash_ciphertext_blob(blob: &[u8]) -> B256 {
    let mut preimage = Vec::with_capacity(RAW_CT_HASH_DOMAIN_SEPARATOR.len() + blob.len());
    preimage.extend_from_slice(RAW_CT_HASH_DOMAIN_SEPARATOR);
    preimage.extend_from_slice(blob);
    keccak256(preimage)
}

/// Derive the handle of every value packed in `blob`.
///
/// The relayer proposes handles for submitted ciphertexts; callers recompute them here and
/// compare byte for byte before trusting anything signed over them.
pub fn derive_handles(
    blob: &[u8],
    type_ids: &[TypeId],
    acl_address: Address,
    chain_id: U256,
    version: u8,
) -> Result<Vec<Handle>, HandleError> {
    if blob.is_empty() {
        return Err(HandleError::EmptyCiphertext);
    }
    if type_ids.len() > MAX_VALUES_PER_INPUT {
        return Err(HandleError::TooManyValues {
            count: type_ids.len(),
            max: MAX_VALUES_PER_INPUT,
        });
    }
    let chain_id_u64 =
        u64::try_from(chain_id).map_err(|_| HandleError::ChainIdTooLarge(chain_id))?;
    let chain_id_word = chain_id.to_be_bytes::<32>();
    let blob_hash = hash_ciphertext_blob(blob);

    let handles = type_ids
        .iter()
        .enumerate()
        .map(|(index, type_id)| {
            // bounded by MAX_VALUES_PER_INPUT above
            let index = index as u8;
            let mut preimage =
                Vec::with_capacity(HANDLE_HASH_DOMAIN_SEPARATOR.len() + 32 + 1 + 20 + 32);
            preimage.extend_from_slice(HANDLE_HASH_DOMAIN_SEPARATOR);
            preimage.extend_from_slice(blob_hash.as_slice());
            preimage.push(index);
            preimage.extend_from_slice(acl_address.as_slice());
            preimage.extend_from_slice(&chain_id_word);
            let digest = keccak256(preimage);

            let mut bytes = [0u8; HANDLE_LEN];
            bytes[..HANDLE_HASH_LEN].copy_from_slice(&digest[..HANDLE_HASH_LEN]);
            bytes[INDEX_BYTE] = index;
            bytes[CHAIN_ID_BYTES].copy_from_slice(&chain_id_u64.to_be_bytes());
            bytes[TYPE_ID_BYTE] = type_id.as_u8();
            bytes[VERSION_BYTE] = version;
            Handle::from_bytes(bytes)
        })
        .collect();

    Ok(handles)
}
