// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::HandleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of encrypted value a handle points at. The discriminant is the byte stored at
/// position 30 of every handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum TypeId {
    Bool = 0,
    Uint4 = 1,
    Uint8 = 2,
    Uint16 = 3,
    Uint32 = 4,
    Uint64 = 5,
    Uint128 = 6,
    Address = 7,
    Uint256 = 8,
}

impl TypeId {
    pub const ALL: [TypeId; 9] = [
        TypeId::Bool,
        TypeId::Uint4,
        TypeId::Uint8,
        TypeId::Uint16,
        TypeId::Uint32,
        TypeId::Uint64,
        TypeId::Uint128,
        TypeId::Address,
        TypeId::Uint256,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Width used by the encryption layer when packing this value. Booleans are packed in 2
    /// bits.
    pub fn bit_width(self) -> u16 {
        match self {
            TypeId::Bool => 2,
            TypeId::Uint4 => 4,
            TypeId::Uint8 => 8,
            TypeId::Uint16 => 16,
            TypeId::Uint32 => 32,
            TypeId::Uint64 => 64,
            TypeId::Uint128 => 128,
            TypeId::Address => 160,
            TypeId::Uint256 => 256,
        }
    }

    pub fn from_bit_width(bits: u16) -> Result<Self, HandleError> {
        TypeId::ALL
            .into_iter()
            .find(|t| t.bit_width() == bits)
            .ok_or(HandleError::UnsupportedBitWidth(bits))
    }
}

impl TryFrom<u8> for TypeId {
    type Error = HandleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        TypeId::ALL
            .get(value as usize)
            .copied()
            .ok_or(HandleError::UnknownTypeId(value))
    }
}

impl From<TypeId> for u8 {
    fn from(value: TypeId) -> Self {
        value.as_u8()
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeId::Bool => "ebool",
            TypeId::Uint4 => "euint4",
            TypeId::Uint8 => "euint8",
            TypeId::Uint16 => "euint16",
            TypeId::Uint32 => "euint32",
            TypeId::Uint64 => "euint64",
            TypeId::Uint128 => "euint128",
            TypeId::Address => "eaddress",
            TypeId::Uint256 => "euint256",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_values_round_trip() {
        for t in TypeId::ALL {
            assert_eq!(TypeId::try_from(t.as_u8()).unwrap(), t);
        }
        assert_eq!(TypeId::Uint32.as_u8(), 4);
        assert_eq!(TypeId::try_from(9), Err(HandleError::UnknownTypeId(9)));
        assert_eq!(TypeId::try_from(255), Err(HandleError::UnknownTypeId(255)));
    }

    #[test]
    fn test_bit_widths() {
        assert_eq!(TypeId::from_bit_width(2).unwrap(), TypeId::Bool);
        assert_eq!(TypeId::from_bit_width(160).unwrap(), TypeId::Address);
        assert_eq!(
            TypeId::from_bit_width(1),
            Err(HandleError::UnsupportedBitWidth(1))
        );
    }
}
