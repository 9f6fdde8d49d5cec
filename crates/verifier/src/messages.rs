// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    CiphertextVerification, DelegatedUserDecryptRequestVerification, PublicDecryptVerification,
    SignedMessage, UserDecryptRequestVerification, UserDecryptResponseVerification,
    ValidationError,
};
use alloy::{
    primitives::{Address, Bytes, B256, U256},
    sol_types::Eip712Domain,
};
use fhr_handle::Handle;
use fhr_utils::parse_prefixed_hex;

pub const MAX_USER_DECRYPT_DURATION_DAYS: u64 = 365;
pub const MAX_USER_DECRYPT_CONTRACT_ADDRESSES: usize = 10;

/// Parse an address that must carry a valid EIP-55 checksum
pub fn parse_checksummed_address(field: &str, value: &str) -> Result<Address, ValidationError> {
    let address: Address = value.parse().map_err(|_| ValidationError::InvalidAddress {
        field: field.to_string(),
        value: value.to_string(),
    })?;
    if address.to_checksum(None) != value {
        return Err(ValidationError::NotChecksummed {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(address)
}

fn parse_bytes(field: &str, value: &str) -> Result<Bytes, ValidationError> {
    Ok(parse_prefixed_hex(field, value)?.into())
}

fn parse_non_empty_bytes(field: &str, value: &str) -> Result<Bytes, ValidationError> {
    let bytes = parse_bytes(field, value)?;
    if bytes.is_empty() {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }
    Ok(bytes)
}

fn handle_words(handles: &[Handle]) -> Vec<B256> {
    handles.iter().copied().map(B256::from).collect()
}

fn check_duration(duration_days: u64) -> Result<(), ValidationError> {
    if !(1..=MAX_USER_DECRYPT_DURATION_DAYS).contains(&duration_days) {
        return Err(ValidationError::OutOfRange {
            field: "durationDays".to_string(),
            value: duration_days,
            min: 1,
            max: MAX_USER_DECRYPT_DURATION_DAYS,
        });
    }
    Ok(())
}

fn parse_contract_addresses(values: &[&str]) -> Result<Vec<Address>, ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::Empty {
            field: "contractAddresses".to_string(),
        });
    }
    if values.len() > MAX_USER_DECRYPT_CONTRACT_ADDRESSES {
        return Err(ValidationError::TooMany {
            field: "contractAddresses".to_string(),
            max: MAX_USER_DECRYPT_CONTRACT_ADDRESSES,
            found: values.len(),
        });
    }
    values
        .iter()
        .map(|v| parse_checksummed_address("contractAddresses", v))
        .collect()
}

/// Caller supplied fields of a [`CiphertextVerification`]
#[derive(Debug, Clone)]
pub struct CiphertextVerificationFields<'a> {
    pub handles: &'a [Handle],
    pub user_address: &'a str,
    pub contract_address: &'a str,
    pub contract_chain_id: u64,
    pub extra_data: &'a str,
}

impl CiphertextVerificationFields<'_> {
    pub fn build(
        &self,
        domain: &Eip712Domain,
    ) -> Result<SignedMessage<CiphertextVerification>, ValidationError> {
        if self.handles.is_empty() {
            return Err(ValidationError::Empty {
                field: "ctHandles".to_string(),
            });
        }
        let message = CiphertextVerification {
            ctHandles: handle_words(self.handles),
            userAddress: parse_checksummed_address("userAddress", self.user_address)?,
            contractAddress: parse_checksummed_address("contractAddress", self.contract_address)?,
            contractChainId: U256::from(self.contract_chain_id),
            extraData: parse_bytes("extraData", self.extra_data)?,
        };
        Ok(SignedMessage::new(domain.clone(), message))
    }
}

/// Caller supplied fields of a (possibly delegated) user decryption authorization
#[derive(Debug, Clone)]
pub struct UserDecryptFields<'a> {
    pub public_key: &'a str,
    pub contract_addresses: &'a [&'a str],
    pub start_timestamp: u64,
    pub duration_days: u64,
    pub extra_data: &'a str,
}

impl UserDecryptFields<'_> {
    pub fn build(
        &self,
        domain: &Eip712Domain,
    ) -> Result<SignedMessage<UserDecryptRequestVerification>, ValidationError> {
        check_duration(self.duration_days)?;
        let message = UserDecryptRequestVerification {
            publicKey: parse_non_empty_bytes("publicKey", self.public_key)?,
            contractAddresses: parse_contract_addresses(self.contract_addresses)?,
            startTimestamp: U256::from(self.start_timestamp),
            durationDays: U256::from(self.duration_days),
            extraData: parse_bytes("extraData", self.extra_data)?,
        };
        Ok(SignedMessage::new(domain.clone(), message))
    }

    pub fn build_delegated(
        &self,
        delegator_address: &str,
        domain: &Eip712Domain,
    ) -> Result<SignedMessage<DelegatedUserDecryptRequestVerification>, ValidationError> {
        check_duration(self.duration_days)?;
        let message = DelegatedUserDecryptRequestVerification {
            publicKey: parse_non_empty_bytes("publicKey", self.public_key)?,
            contractAddresses: parse_contract_addresses(self.contract_addresses)?,
            delegatorAddress: parse_checksummed_address("delegatorAddress", delegator_address)?,
            startTimestamp: U256::from(self.start_timestamp),
            durationDays: U256::from(self.duration_days),
            extraData: parse_bytes("extraData", self.extra_data)?,
        };
        Ok(SignedMessage::new(domain.clone(), message))
    }
}

/// What KMS nodes sign for a public decryption of `handles`
pub fn public_decrypt_message(
    domain: &Eip712Domain,
    handles: &[Handle],
    decrypted_result: Bytes,
    extra_data: Bytes,
) -> SignedMessage<PublicDecryptVerification> {
    SignedMessage::new(
        domain.clone(),
        PublicDecryptVerification {
            ctHandles: handle_words(handles),
            decryptedResult: decrypted_result,
            extraData: extra_data,
        },
    )
}

/// What a single KMS node signs over its re-encrypted `share`
pub fn user_decrypt_response_message(
    domain: &Eip712Domain,
    public_key: Bytes,
    handles: &[Handle],
    share: Bytes,
    extra_data: Bytes,
) -> SignedMessage<UserDecryptResponseVerification> {
    SignedMessage::new(
        domain.clone(),
        UserDecryptResponseVerification {
            publicKey: public_key,
            ctHandles: handle_words(handles),
            userDecryptedShare: share,
            extraData: extra_data,
        },
    )
}
