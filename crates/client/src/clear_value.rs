// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{Address, U256};
use fhr_handle::{Handle, TypeId};
use std::fmt;
use thiserror::Error;

pub const WORD_LEN: usize = 32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClearValueError {
    #[error("Decrypted result holds {found} bytes, expected {expected} (one word per handle)")]
    WrongLength { expected: usize, found: usize },

    #[error("Decrypted value {index} does not fit {type_id}")]
    OutOfRange { index: usize, type_id: TypeId },
}

/// A decrypted value, typed by the handle it was decrypted from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearValue {
    Bool(bool),
    Uint { type_id: TypeId, value: U256 },
    Address(Address),
}

impl ClearValue {
    /// Interpret one ABI word as a value of `type_id`. Values wider than the type are rejected.
    pub fn from_word(type_id: TypeId, word: U256, index: usize) -> Result<Self, ClearValueError> {
        let out_of_range = || ClearValueError::OutOfRange { index, type_id };
        match type_id {
            TypeId::Bool => match word {
                w if w == U256::ZERO => Ok(ClearValue::Bool(false)),
                w if w == U256::from(1u8) => Ok(ClearValue::Bool(true)),
                _ => Err(out_of_range()),
            },
            TypeId::Address => {
                if word.bit_len() > 160 {
                    return Err(out_of_range());
                }
                let bytes = word.to_be_bytes::<WORD_LEN>();
                Ok(ClearValue::Address(Address::from_slice(&bytes[12..])))
            }
            _ => {
                if word.bit_len() > usize::from(type_id.bit_width()) {
                    return Err(out_of_range());
                }
                Ok(ClearValue::Uint {
                    type_id,
                    value: word,
                })
            }
        }
    }

    pub fn type_id(&self) -> TypeId {
        match self {
            ClearValue::Bool(_) => TypeId::Bool,
            ClearValue::Uint { type_id, .. } => *type_id,
            ClearValue::Address(_) => TypeId::Address,
        }
    }

    pub fn as_u256(&self) -> U256 {
        match self {
            ClearValue::Bool(b) => U256::from(*b as u8),
            ClearValue::Uint { value, .. } => *value,
            ClearValue::Address(a) => U256::from_be_slice(a.as_slice()),
        }
    }
}

impl fmt::Display for ClearValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClearValue::Bool(b) => write!(f, "{b}"),
            ClearValue::Uint { value, .. } => write!(f, "{value}"),
            ClearValue::Address(a) => write!(f, "{}", a.to_checksum(None)),
        }
    }
}

/// Decode the ABI encoded cleartexts of a public decryption, one 32-byte word per handle
pub fn decode_clear_values(
    handles: &[Handle],
    decrypted_result: &[u8],
) -> Result<Vec<ClearValue>, crate::ClientError> {
    let expected = handles.len() * WORD_LEN;
    if decrypted_result.len() != expected {
        return Err(ClearValueError::WrongLength {
            expected,
            found: decrypted_result.len(),
        }
        .into());
    }
    handles
        .iter()
        .zip(decrypted_result.chunks_exact(WORD_LEN))
        .enumerate()
        .map(|(index, (handle, word))| -> Result<ClearValue, crate::ClientError> {
            let type_id = handle.type_id()?;
            Ok(ClearValue::from_word(
                type_id,
                U256::from_be_slice(word),
                index,
            )?)
        })
        .collect()
}
