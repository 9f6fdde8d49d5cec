// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! EIP-712 structs signed by coprocessors, KMS nodes and users.
//! WARNING: field names, types and order are part of the signed schema. Any change here is a
//! breaking change and invalidates every signature.

use alloy::{
    primitives::{Address, U256},
    sol,
    sol_types::Eip712Domain,
};

pub const INPUT_VERIFICATION_DOMAIN_NAME: &str = "InputVerification";
pub const DECRYPTION_DOMAIN_NAME: &str = "Decryption";
pub const DOMAIN_VERSION: &str = "1";

sol! {
    /// Signed by coprocessors once a ciphertext and its proof have been admitted
    #[derive(Debug, PartialEq, Eq)]
    struct CiphertextVerification {
        bytes32[] ctHandles;
        address userAddress;
        address contractAddress;
        uint256 contractChainId;
        bytes extraData;
    }

    /// Signed by a user to authorize re-encryption of their handles under `publicKey`
    #[derive(Debug, PartialEq, Eq)]
    struct UserDecryptRequestVerification {
        bytes publicKey;
        address[] contractAddresses;
        uint256 startTimestamp;
        uint256 durationDays;
        bytes extraData;
    }

    /// Signed by a delegate decrypting on behalf of `delegatorAddress`
    #[derive(Debug, PartialEq, Eq)]
    struct DelegatedUserDecryptRequestVerification {
        bytes publicKey;
        address[] contractAddresses;
        address delegatorAddress;
        uint256 startTimestamp;
        uint256 durationDays;
        bytes extraData;
    }

    /// Signed by KMS nodes over the ABI encoded cleartexts of a public decryption
    #[derive(Debug, PartialEq, Eq)]
    struct PublicDecryptVerification {
        bytes32[] ctHandles;
        bytes decryptedResult;
        bytes extraData;
    }

    /// Signed by each KMS node over its own re-encrypted share
    #[derive(Debug, PartialEq, Eq)]
    struct UserDecryptResponseVerification {
        bytes publicKey;
        bytes32[] ctHandles;
        bytes userDecryptedShare;
        bytes extraData;
    }
}

fn domain(name: &'static str, chain_id: u64, verifying_contract: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(name.into()),
        Some(DOMAIN_VERSION.into()),
        Some(U256::from(chain_id)),
        Some(verifying_contract),
        None,
    )
}

/// Domain of ciphertext verification signatures. `verifying_contract` lives on the gateway chain.
pub fn input_verification_domain(chain_id: u64, verifying_contract: Address) -> Eip712Domain {
    domain(INPUT_VERIFICATION_DOMAIN_NAME, chain_id, verifying_contract)
}

/// Domain shared by decryption requests and KMS decryption responses
pub fn decryption_domain(chain_id: u64, verifying_contract: Address) -> Eip712Domain {
    domain(DECRYPTION_DOMAIN_NAME, chain_id, verifying_contract)
}

/// The two domains a client session verifies against. Fixed for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    pub input_verification: Eip712Domain,
    pub decryption: Eip712Domain,
}

impl Domains {
    pub fn new(
        gateway_chain_id: u64,
        input_verification_contract: Address,
        decryption_contract: Address,
    ) -> Self {
        Self {
            input_verification: input_verification_domain(
                gateway_chain_id,
                input_verification_contract,
            ),
            decryption: decryption_domain(gateway_chain_id, decryption_contract),
        }
    }
}
