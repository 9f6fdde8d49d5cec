// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{parse_checksummed_address, ValidationError};
use alloy::primitives::Address;
use std::collections::HashSet;

/// Ordered set of signers with the minimum number of distinct signatures required
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdSignerSet {
    signers: Vec<Address>,
    threshold: usize,
}

impl ThresholdSignerSet {
    pub fn new(signers: Vec<Address>, threshold: usize) -> Result<Self, ValidationError> {
        if signers.is_empty() {
            return Err(ValidationError::EmptySignerSet);
        }
        if threshold == 0 || threshold > signers.len() {
            return Err(ValidationError::InvalidThreshold {
                threshold,
                signers: signers.len(),
            });
        }
        let mut seen = HashSet::with_capacity(signers.len());
        if let Some(dup) = signers.iter().find(|s| !seen.insert(**s)) {
            return Err(ValidationError::DuplicateSignerInSet(*dup));
        }
        Ok(Self { signers, threshold })
    }

    /// Build from checksummed address strings as published in configuration
    pub fn from_checksummed<S: AsRef<str>>(
        signers: &[S],
        threshold: usize,
    ) -> Result<Self, ValidationError> {
        let signers = signers
            .iter()
            .map(|s| parse_checksummed_address("signers", s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(signers, threshold)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.signers.contains(address)
    }

    pub fn signers(&self) -> &[Address] {
        &self.signers
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}
