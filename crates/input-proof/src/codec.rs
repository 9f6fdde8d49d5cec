// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Bytes;
use fhr_handle::{Handle, HANDLE_LEN};
use fhr_utils::{to_hex, Hexf};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const SIGNATURE_LEN: usize = 65;
pub const HEADER_LEN: usize = 2;
pub const MAX_HANDLES: usize = u8::MAX as usize;
pub const MAX_SIGNATURES: usize = u8::MAX as usize;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofCodecError {
    #[error("An input proof must reference at least one handle")]
    NoHandles,

    #[error("Too many handles for an input proof: {count} (max {max})")]
    TooManyHandles { count: usize, max: usize },

    #[error("Too many signatures for an input proof: {count} (max {max})")]
    TooManySignatures { count: usize, max: usize },

    #[error("Signature {index} must be {SIGNATURE_LEN} bytes, found {length}")]
    InvalidSignatureLength { index: usize, length: usize },

    #[error("Input proof truncated: header requires at least {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputProof {
    pub handles: Vec<Handle>,
    pub signatures: Vec<Bytes>,
    pub extra_data: Bytes,
}

impl InputProof {
    pub fn encode(&self) -> Result<Bytes, ProofCodecError> {
        encode(&self.handles, &self.signatures, &self.extra_data)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ProofCodecError> {
        decode(bytes)
    }

    /// `0x` prefixed hex of the encoded proof as contracts expect it in calldata
    pub fn to_hex(&self) -> Result<String, ProofCodecError> {
        Ok(to_hex(self.encode()?))
    }
}

impl fmt::Debug for InputProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputProof")
            .field("handles", &self.handles)
            .field("signatures", &self.signatures.len())
            .field("extra_data", &Hexf(&self.extra_data))
            .finish()
    }
}

fn encoded_len(handles: usize, signatures: usize) -> usize {
    HEADER_LEN + handles * HANDLE_LEN + signatures * SIGNATURE_LEN
}

pub fn encode(
    handles: &[Handle],
    signatures: &[Bytes],
    extra_data: &[u8],
) -> Result<Bytes, ProofCodecError> {
    if handles.is_empty() {
        return Err(ProofCodecError::NoHandles);
    }
    if handles.len() > MAX_HANDLES {
        return Err(ProofCodecError::TooManyHandles {
            count: handles.len(),
            max: MAX_HANDLES,
        });
    }
    if signatures.len() > MAX_SIGNATURES {
        return Err(ProofCodecError::TooManySignatures {
            count: signatures.len(),
            max: MAX_SIGNATURES,
        });
    }
    if let Some((index, sig)) = signatures
        .iter()
        .enumerate()
        .find(|(_, sig)| sig.len() != SIGNATURE_LEN)
    {
        return Err(ProofCodecError::InvalidSignatureLength {
            index,
            length: sig.len(),
        });
    }

    let capacity = encoded_len(handles.len(), signatures.len()) + extra_data.len();
    let mut out = Vec::with_capacity(capacity);
    // lengths checked above
    out.push(handles.len() as u8);
    out.push(signatures.len() as u8);
    for handle in handles {
        out.extend_from_slice(handle.as_bytes());
    }
    for sig in signatures {
        out.extend_from_slice(sig);
    }
    out.extend_from_slice(extra_data);
    Ok(out.into())
}

pub fn decode(bytes: &[u8]) -> Result<InputProof, ProofCodecError> {
    if bytes.len() < HEADER_LEN {
        return Err(ProofCodecError::Truncated {
            expected: HEADER_LEN,
            found: bytes.len(),
        });
    }
    let n_handles = bytes[0] as usize;
    let n_signatures = bytes[1] as usize;
    if n_handles == 0 {
        return Err(ProofCodecError::NoHandles);
    }

    let expected = encoded_len(n_handles, n_signatures);
    if bytes.len() < expected {
        return Err(ProofCodecError::Truncated {
            expected,
            found: bytes.len(),
        });
    }

    let (handle_bytes, rest) = bytes[HEADER_LEN..].split_at(n_handles * HANDLE_LEN);
    let (signature_bytes, extra_data) = rest.split_at(n_signatures * SIGNATURE_LEN);

    let handles = handle_bytes
        .chunks_exact(HANDLE_LEN)
        .map(|chunk| {
            let mut raw = [0u8; HANDLE_LEN];
            raw.copy_from_slice(chunk);
            Handle::from_bytes(raw)
        })
        .collect();
    let signatures = signature_bytes
        .chunks_exact(SIGNATURE_LEN)
        .map(Bytes::copy_from_slice)
        .collect();

    Ok(InputProof {
        handles,
        signatures,
        extra_data: Bytes::copy_from_slice(extra_data),
    })
}
