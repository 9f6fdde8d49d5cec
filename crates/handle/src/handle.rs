// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{HandleError, TypeId};
use alloy::primitives::B256;
use fhr_utils::{parse_hex_array, to_hex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

pub const HANDLE_LEN: usize = 32;
/// Number of hash bytes kept at the front of a handle
pub const HANDLE_HASH_LEN: usize = 21;
pub const INDEX_BYTE: usize = 21;
pub const CHAIN_ID_BYTES: std::ops::Range<usize> = 22..30;
pub const TYPE_ID_BYTE: usize = 30;
pub const VERSION_BYTE: usize = 31;
/// Index value marking a handle that is no longer positional within its input batch
pub const FINALIZED_INDEX: u8 = 255;

/// A 32 byte identifier for a ciphertext.
///
/// Layout: `hash[0..21] | index | chain_id (8 bytes BE) | type_id | version`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle([u8; HANDLE_LEN]);

impl Handle {
    pub const fn from_bytes(bytes: [u8; HANDLE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HANDLE_LEN] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn from_hex(value: &str) -> Result<Self, HandleError> {
        Ok(Self(parse_hex_array::<HANDLE_LEN>("handle", value)?))
    }

    pub fn to_hex(&self) -> String {
        to_hex(self.0)
    }

    /// Position within the batch the handle was derived in, `None` once finalized
    pub fn index(&self) -> Option<u8> {
        match self.0[INDEX_BYTE] {
            FINALIZED_INDEX => None,
            i => Some(i),
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.0[INDEX_BYTE] == FINALIZED_INDEX
    }

    /// A copy of this handle with the index byte set to the finalized sentinel
    pub fn finalized(&self) -> Self {
        let mut bytes = self.0;
        bytes[INDEX_BYTE] = FINALIZED_INDEX;
        Self(bytes)
    }

    pub fn chain_id(&self) -> u64 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.0[CHAIN_ID_BYTES]);
        u64::from_be_bytes(raw)
    }

    pub fn type_id(&self) -> Result<TypeId, HandleError> {
        decode_type_id(self)
    }

    pub fn version(&self) -> u8 {
        self.0[VERSION_BYTE]
    }
}

/// Read the type id stored in `handle` without any other context
pub fn decode_type_id(handle: &Handle) -> Result<TypeId, HandleError> {
    TypeId::try_from(handle.0[TYPE_ID_BYTE])
}

impl From<[u8; HANDLE_LEN]> for Handle {
    fn from(value: [u8; HANDLE_LEN]) -> Self {
        Self(value)
    }
}

impl From<B256> for Handle {
    fn from(value: B256) -> Self {
        Self(value.0)
    }
}

impl From<Handle> for B256 {
    fn from(value: Handle) -> Self {
        B256::from(value.0)
    }
}

impl TryFrom<&[u8]> for Handle {
    type Error = HandleError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; HANDLE_LEN] = value
            .try_into()
            .map_err(|_| HandleError::InvalidLength(value.len()))?;
        Ok(Self(bytes))
    }
}

impl AsRef<[u8]> for Handle {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Handle {
    type Err = HandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Handle::from_hex(s)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.to_hex())
    }
}

impl Serialize for Handle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Handle::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
