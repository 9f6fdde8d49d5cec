// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{address, Address, Bytes};
use fhr_handle::{derive_handles, Handle, TypeId};
use fhr_input_proof::InputProof;
use fhr_test_helpers::{outsider, sign_with, TestSigners};
use fhr_verifier::{
    compute_input_proof, input_verification_domain, recover_signers, verify_signed,
    verify_threshold, CiphertextVerification, CiphertextVerificationFields, SignedMessage,
    ThresholdSignerSet, VerifyError,
};
use proptest::prelude::*;

const GATEWAY_CHAIN_ID: u64 = 10_901;
const INPUT_VERIFICATION: Address = address!("0x812b06e1CDCE800494b79fFE4f925A504a9A9810");
const ACL: Address = address!("0x687820221192C5B662b25367F70076A37bc79b6c");

fn handles() -> Vec<Handle> {
    derive_handles(
        &[0xde, 0xad, 0xbe, 0xef],
        &[TypeId::Uint32, TypeId::Bool],
        ACL,
        alloy::primitives::U256::from(11_155_111u64),
        0,
    )
    .unwrap()
}

fn message(extra_data: &str) -> SignedMessage<CiphertextVerification> {
    let user = TestSigners::new(1).checksummed().remove(0);
    CiphertextVerificationFields {
        handles: &handles(),
        user_address: &user,
        contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3",
        contract_chain_id: 11_155_111,
        extra_data,
    }
    .build(&input_verification_domain(GATEWAY_CHAIN_ID, INPUT_VERIFICATION))
    .unwrap()
}

fn set(signers: &TestSigners, threshold: usize) -> ThresholdSignerSet {
    ThresholdSignerSet::new(signers.addresses(), threshold).unwrap()
}

#[test]
fn test_compute_input_proof_happy_path() {
    let signers = TestSigners::new(4);
    let msg = message("0x00");
    let signatures = signers.sign_by(&[2, 0, 3], &msg.signing_hash());

    let proof = compute_input_proof(signatures.clone(), msg, &set(&signers, 3)).unwrap();
    assert_eq!(proof.handles, handles());
    assert_eq!(proof.signatures, signatures);
    assert_eq!(proof.extra_data, Bytes::from(vec![0x00]));

    let encoded = proof.encode().unwrap();
    assert_eq!(encoded[0], 2);
    assert_eq!(encoded[1], 3);
    assert_eq!(InputProof::decode(&encoded).unwrap(), proof);
}

#[test]
fn test_recovered_in_signature_order() {
    let signers = TestSigners::new(3);
    let msg = message("0x");
    let signed = msg.clone().with_signatures(signers.sign_by(&[1, 2], &msg.signing_hash()));
    assert_eq!(
        recover_signers(&signed).unwrap(),
        vec![signers.address(1), signers.address(2)]
    );
}

#[test]
fn test_threshold_not_met_yields_no_proof() {
    let signers = TestSigners::new(4);
    let msg = message("0x");
    let signatures = signers.sign_by(&[1, 3], &msg.signing_hash());
    assert_eq!(
        compute_input_proof(signatures, msg, &set(&signers, 3)).unwrap_err(),
        VerifyError::ThresholdNotMet {
            found: 2,
            required: 3
        }
    );
}

#[test]
fn test_duplicate_signature_rejected_even_below_threshold() {
    let signers = TestSigners::new(2);
    let msg = message("0x");
    let sig = signers.sign_hash(0, &msg.signing_hash());
    let signed = msg.with_signatures(vec![sig.clone(), sig]);
    assert_eq!(
        verify_signed(&signed, &set(&signers, 1)).unwrap_err(),
        VerifyError::DuplicateSigner(signers.address(0))
    );
}

#[test]
fn test_unknown_signer_rejected() {
    let signers = TestSigners::new(3);
    let msg = message("0x");
    let hash = msg.signing_hash();
    let intruder = outsider();
    let mut signatures = signers.sign_by(&[0, 1], &hash);
    signatures.push(sign_with(&intruder, &hash));

    assert_eq!(
        verify_signed(&msg.with_signatures(signatures), &set(&signers, 2)).unwrap_err(),
        VerifyError::UnknownSigner(intruder.address())
    );
}

#[test]
fn test_signature_over_other_message_is_unknown() {
    let signers = TestSigners::new(2);
    let signed_for = message("0x01");
    let presented = message("0x02");
    let signatures = signers.sign_by(&[0, 1], &signed_for.signing_hash());
    assert!(matches!(
        verify_signed(&presented.with_signatures(signatures), &set(&signers, 2)),
        Err(VerifyError::UnknownSigner(_))
    ));
}

#[test]
fn test_bad_signature_length() {
    let signers = TestSigners::new(1);
    let msg = message("0x");
    let signed = msg.with_signatures(vec![Bytes::from(vec![0u8; 64])]);
    assert_eq!(
        verify_signed(&signed, &set(&signers, 1)).unwrap_err(),
        VerifyError::InvalidSignatureLength {
            index: 0,
            length: 64
        }
    );
}

#[test]
fn test_domain_binding() {
    let signers = TestSigners::new(1);
    let msg = message("0x");
    let mut other = msg.clone();
    other.domain = input_verification_domain(GATEWAY_CHAIN_ID + 1, INPUT_VERIFICATION);
    let signatures = signers.sign_by(&[0], &other.signing_hash());
    assert!(verify_signed(&msg.with_signatures(signatures), &set(&signers, 1)).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_threshold_monotonic(
        size in 1usize..6,
        threshold_seed in 0usize..6,
        count_seed in 0usize..6,
    ) {
        let threshold = threshold_seed % size + 1;
        let count = count_seed % (size + 1);
        let signers = TestSigners::new(size);
        let signer_set = set(&signers, threshold);
        let recovered: Vec<Address> = signers.addresses().into_iter().take(count).collect();

        let result = verify_threshold(&recovered, &signer_set);
        prop_assert_eq!(result.is_ok(), count >= threshold);
    }
}
