// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{ChainError, ClearValueError};
use alloy::primitives::{Address, Bytes};
use fhr_handle::{Handle, HandleError};
use fhr_request::RequestError;
use fhr_verifier::{ValidationError, VerifyError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Handle(#[from] HandleError),

    #[error("Verification failed: {0}")]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Cleartext(#[from] ClearValueError),

    #[error("Invalid client configuration: {0:#}")]
    Config(anyhow::Error),

    #[error("Relayer did not accept the input proof")]
    InputProofRejected,

    #[error("Relayer returned {found} handles, expected {expected}")]
    HandleCountMismatch { expected: usize, found: usize },

    #[error("Handle {index} returned by the relayer is {found}, expected {expected}")]
    HandleMismatch {
        index: usize,
        expected: Handle,
        found: Handle,
    },

    #[error("Relayer reports extra data {found}, the request carried {expected}")]
    ExtraDataMismatch { expected: Bytes, found: Bytes },

    #[error("Handle {0} is not publicly decryptable")]
    NotDecryptable(Handle),

    #[error("{account} is not allowed to decrypt handle {handle}")]
    NotAllowed { handle: Handle, account: Address },

    #[error("Contract {contract} of handle {handle} is not listed in contractAddresses")]
    ContractNotAuthorized { handle: Handle, contract: Address },

    #[error("User decrypt request is signed by {found}, expected {expected}")]
    UserSignatureMismatch { expected: Address, found: Address },

    #[error("User decrypt authorization expired at unix time {0}")]
    AuthorizationExpired(u64),

    #[error("Share decryption failed: {0:#}")]
    Decryptor(anyhow::Error),
}
