// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::U256;
use fhr_utils::HexError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    #[error("Cannot derive handles for an empty ciphertext")]
    EmptyCiphertext,

    #[error("Too many values in one ciphertext: {count} (max {max})")]
    TooManyValues { count: usize, max: usize },

    #[error("Chain id {0} does not fit in 8 bytes")]
    ChainIdTooLarge(U256),

    #[error("Unknown type id {0}")]
    UnknownTypeId(u8),

    #[error("Unsupported encryption bit width {0}")]
    UnsupportedBitWidth(u16),

    #[error("Handle must be 32 bytes, found {0}")]
    InvalidLength(usize),

    #[error(transparent)]
    Hex(#[from] HexError),
}
