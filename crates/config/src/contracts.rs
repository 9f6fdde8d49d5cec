// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::validation::checksummed_address;
use alloy::primitives::Address;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Contract addresses as written in the configuration file (EIP-55 checksummed strings)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContractsConfig {
    /// Host chain
    pub acl: String,
    pub input_verifier: String,
    pub kms_verifier: String,
    /// Gateway chain EIP-712 verifying contracts
    pub input_verification: String,
    pub decryption: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    pub acl: Address,
    pub input_verifier: Address,
    pub kms_verifier: Address,
    pub input_verification: Address,
    pub decryption: Address,
}

impl TryFrom<&ContractsConfig> for ContractAddresses {
    type Error = anyhow::Error;

    fn try_from(value: &ContractsConfig) -> Result<Self> {
        Ok(Self {
            acl: checksummed_address("contracts.acl", &value.acl)?,
            input_verifier: checksummed_address("contracts.input_verifier", &value.input_verifier)?,
            kms_verifier: checksummed_address("contracts.kms_verifier", &value.kms_verifier)?,
            input_verification: checksummed_address(
                "contracts.input_verification",
                &value.input_verification,
            )?,
            decryption: checksummed_address("contracts.decryption", &value.decryption)?,
        })
    }
}
