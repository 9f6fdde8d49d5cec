// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Request and result bodies of the relayer operations

use alloy::primitives::Bytes;
use fhr_handle::Handle;
use serde::{Deserialize, Serialize};

/// Chain ids travel as hex quantities, eg. `0xaa36a7`
pub fn chain_id_quantity(chain_id: u64) -> String {
    format!("{chain_id:#x}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputProofPayload {
    pub contract_address: String,
    pub user_address: String,
    pub ciphertext_with_input_verification: Bytes,
    pub contract_chain_id: String,
    pub extra_data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputProofResult {
    pub accepted: bool,
    #[serde(default)]
    pub handles: Vec<Handle>,
    #[serde(default)]
    pub signatures: Vec<Bytes>,
    /// Extra data the coprocessors signed over, when the relayer echoes it
    #[serde(default)]
    pub extra_data: Option<Bytes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicDecryptPayload {
    pub ciphertext_handles: Vec<Handle>,
    pub extra_data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicDecryptResult {
    pub decrypted_value: Bytes,
    pub signatures: Vec<Bytes>,
    /// Extra data the KMS signed over. Absent means the submitted extra data.
    #[serde(default)]
    pub extra_data: Option<Bytes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleContractPair {
    pub handle: Handle,
    pub contract_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestValidity {
    pub start_timestamp: String,
    pub duration_days: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDecryptPayload {
    pub handle_contract_pairs: Vec<HandleContractPair>,
    pub request_validity: RequestValidity,
    pub contracts_chain_id: String,
    pub contract_addresses: Vec<String>,
    pub user_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegator_address: Option<String>,
    pub signature: Bytes,
    pub public_key: Bytes,
    pub extra_data: Bytes,
}

/// One KMS node's signed re-encryption
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDecryptShare {
    pub payload: Bytes,
    pub signature: Bytes,
    #[serde(default)]
    pub extra_data: Bytes,
}
