// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use fhr_input_proof::ProofCodecError;
use fhr_utils::HexError;
use thiserror::Error;

/// Raised while building typed data or signer sets, before any cryptographic work
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid address")]
    InvalidAddress { field: String, value: String },

    #[error("{field}: '{value}' is not a checksummed address")]
    NotChecksummed { field: String, value: String },

    #[error("{field} must not be empty")]
    Empty { field: String },

    #[error("{field}: {value} is outside of {min}..={max}")]
    OutOfRange {
        field: String,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("{field}: at most {max} entries are allowed, found {found}")]
    TooMany {
        field: String,
        max: usize,
        found: usize,
    },

    #[error("Signer set must not be empty")]
    EmptySignerSet,

    #[error("Threshold {threshold} is invalid for a set of {signers} signers")]
    InvalidThreshold { threshold: usize, signers: usize },

    #[error("Signer {0} appears more than once in the signer set")]
    DuplicateSignerInSet(Address),

    #[error(transparent)]
    Hex(#[from] HexError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Signature {index} must be 65 bytes, found {length}")]
    InvalidSignatureLength { index: usize, length: usize },

    #[error("Signature {index} is malformed: {reason}")]
    MalformedSignature { index: usize, reason: String },

    #[error("Could not recover signer of signature {index}: {reason}")]
    RecoveryFailed { index: usize, reason: String },

    #[error("Signer {0} signed more than once")]
    DuplicateSigner(Address),

    #[error("Signer {0} is not part of the signer set")]
    UnknownSigner(Address),

    #[error("Threshold not met: {found} valid signers, {required} required")]
    ThresholdNotMet { found: usize, required: usize },

    #[error(transparent)]
    Codec(#[from] ProofCodecError),
}
