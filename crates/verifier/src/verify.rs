// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{CiphertextVerification, ThresholdSignerSet, VerifyError};
use alloy::{
    primitives::{Address, Bytes, Signature, B256},
    sol_types::{Eip712Domain, SolStruct},
};
use fhr_handle::Handle;
use fhr_input_proof::{InputProof, SIGNATURE_LEN};
use std::collections::HashSet;
use tracing::debug;

/// A typed data instance together with the signatures claimed over it
#[derive(Debug, Clone)]
pub struct SignedMessage<M> {
    pub domain: Eip712Domain,
    pub message: M,
    pub signatures: Vec<Bytes>,
}

impl<M: SolStruct> SignedMessage<M> {
    pub fn new(domain: Eip712Domain, message: M) -> Self {
        Self {
            domain,
            message,
            signatures: vec![],
        }
    }

    pub fn with_signatures(mut self, signatures: Vec<Bytes>) -> Self {
        self.signatures = signatures;
        self
    }

    pub fn signing_hash(&self) -> B256 {
        self.message.eip712_signing_hash(&self.domain)
    }
}

/// Recover the address that produced `signature` over `hash`. `index` is only used for error
/// reporting.
pub fn recover_signer(
    hash: &B256,
    signature: &[u8],
    index: usize,
) -> Result<Address, VerifyError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(VerifyError::InvalidSignatureLength {
            index,
            length: signature.len(),
        });
    }
    let signature =
        Signature::from_raw(signature).map_err(|e| VerifyError::MalformedSignature {
            index,
            reason: e.to_string(),
        })?;
    signature
        .recover_address_from_prehash(hash)
        .map_err(|e| VerifyError::RecoveryFailed {
            index,
            reason: e.to_string(),
        })
}

pub fn recover_signers<M: SolStruct>(
    signed: &SignedMessage<M>,
) -> Result<Vec<Address>, VerifyError> {
    let hash = signed.signing_hash();
    signed
        .signatures
        .iter()
        .enumerate()
        .map(|(index, sig)| recover_signer(&hash, sig, index))
        .collect()
}

/// Accept `recovered` only if it holds no repeats, only known signers and enough of them.
///
/// Checked in that order.
pub fn verify_threshold(
    recovered: &[Address],
    signer_set: &ThresholdSignerSet,
) -> Result<(), VerifyError> {
    let mut distinct = HashSet::with_capacity(recovered.len());
    for address in recovered {
        if !distinct.insert(*address) {
            return Err(VerifyError::DuplicateSigner(*address));
        }
    }

    if let Some(unknown) = recovered.iter().find(|a| !signer_set.contains(a)) {
        return Err(VerifyError::UnknownSigner(*unknown));
    }

    if distinct.len() < signer_set.threshold() {
        return Err(VerifyError::ThresholdNotMet {
            found: distinct.len(),
            required: signer_set.threshold(),
        });
    }

    debug!(
        signers = distinct.len(),
        threshold = signer_set.threshold(),
        "threshold verified"
    );
    Ok(())
}

/// Recover every signer of `signed` and check them against `signer_set`
pub fn verify_signed<M: SolStruct>(
    signed: &SignedMessage<M>,
    signer_set: &ThresholdSignerSet,
) -> Result<Vec<Address>, VerifyError> {
    let recovered = recover_signers(signed)?;
    verify_threshold(&recovered, signer_set)?;
    Ok(recovered)
}

/// Verify coprocessor signatures over `message` and pack them into an input proof
pub fn compute_input_proof(
    signatures: Vec<Bytes>,
    message: SignedMessage<CiphertextVerification>,
    signer_set: &ThresholdSignerSet,
) -> Result<InputProof, VerifyError> {
    let signed = message.with_signatures(signatures);
    verify_signed(&signed, signer_set)?;

    let handles: Vec<Handle> = signed
        .message
        .ctHandles
        .iter()
        .copied()
        .map(Handle::from)
        .collect();
    let proof = InputProof {
        handles,
        signatures: signed.signatures,
        extra_data: signed.message.extraData,
    };
    // rejects out of capacity proofs
    proof.encode()?;
    Ok(proof)
}
