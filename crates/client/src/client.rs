// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    chain_id_quantity, decode_clear_values, ChainStateReader, ClearValue, ClientError,
    ContractChainReader, EncryptedInput, HandleContractPair, InputProofPayload, InputProofResult,
    PublicDecryptPayload, PublicDecryptResult, RequestValidity, ShareDecryptor,
    UserDecryptPayload, UserDecryptShare, VerifiedShare,
};
use alloy::primitives::{Address, Bytes, U256};
use anyhow::anyhow;
use chrono::Utc;
use fhr_config::RelayerConfig;
use fhr_handle::{derive_handles, Handle};
use fhr_input_proof::InputProof;
use fhr_request::{
    AbortSignal, HttpTransport, RelayerOperation, RelayerRequest, RelayerTransport, RequestError,
};
use fhr_utils::{parse_prefixed_hex, to_hex};
use fhr_verifier::{
    compute_input_proof, parse_checksummed_address, public_decrypt_message, recover_signer,
    user_decrypt_response_message, verify_signed, verify_threshold, CiphertextVerificationFields,
    Domains, ThresholdSignerSet, UserDecryptFields, ValidationError,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

const SECONDS_PER_DAY: u64 = 86_400;

/// Coprocessor and KMS signer sets, read once when the client connects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerSets {
    pub coprocessors: ThresholdSignerSet,
    pub kms: ThresholdSignerSet,
}

/// Cleartexts of a public decryption with the KMS signatures that vouch for them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicDecryption {
    pub values: Vec<ClearValue>,
    pub decrypted_result: Bytes,
    pub signatures: Vec<Bytes>,
    pub extra_data: Bytes,
}

/// A user's signed authorization to re-encrypt `handle_contract_pairs` under `public_key`.
///
/// `user_address` is the signer. When `delegator_address` is set the user decrypts on the
/// delegator's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDecryptRequest {
    pub handle_contract_pairs: Vec<(Handle, String)>,
    pub user_address: String,
    pub delegator_address: Option<String>,
    pub public_key: String,
    pub signature: String,
    pub contract_addresses: Vec<String>,
    pub start_timestamp: u64,
    pub duration_days: u64,
    pub extra_data: String,
}

/// Talks to an untrusted relayer and only hands back results it could verify itself
pub struct FhevmClient {
    config: RelayerConfig,
    transport: Arc<dyn RelayerTransport>,
    chain: Arc<dyn ChainStateReader>,
    domains: Domains,
    signers: Arc<SignerSets>,
    abort: Option<AbortSignal>,
}

/// Reqwest transport carrying the configured api key and per-call timeout
pub fn http_transport(config: &RelayerConfig) -> Result<Arc<dyn RelayerTransport>, ClientError> {
    let transport = HttpTransport::new(config.api_key.as_deref(), config.request.call_timeout())
        .map_err(RequestError::from)?;
    Ok(Arc::new(transport))
}

impl FhevmClient {
    /// Talk to the configured relayer over http and read signer sets and ACL state over
    /// `rpc_url`
    pub async fn from_config(config: RelayerConfig) -> Result<Self, ClientError> {
        let transport = http_transport(&config)?;
        let chain = Arc::new(ContractChainReader::from_config(&config).await?);
        Self::connect(config, transport, chain).await
    }

    pub async fn connect(
        config: RelayerConfig,
        transport: Arc<dyn RelayerTransport>,
        chain: Arc<dyn ChainStateReader>,
    ) -> Result<Self, ClientError> {
        let coprocessors = chain.coprocessor_signers().await?;
        let kms = chain.kms_signers().await?;
        let signers = SignerSets {
            coprocessors: ThresholdSignerSet::new(coprocessors.signers, coprocessors.threshold)?,
            kms: ThresholdSignerSet::new(kms.signers, kms.threshold)?,
        };
        info!(
            coprocessors = signers.coprocessors.len(),
            coprocessor_threshold = signers.coprocessors.threshold(),
            kms = signers.kms.len(),
            kms_threshold = signers.kms.threshold(),
            "signer sets loaded"
        );
        Ok(Self::with_signer_sets(config, transport, chain, signers))
    }

    pub fn with_signer_sets(
        config: RelayerConfig,
        transport: Arc<dyn RelayerTransport>,
        chain: Arc<dyn ChainStateReader>,
        signers: SignerSets,
    ) -> Self {
        let domains = Domains::new(
            config.gateway_chain_id,
            config.contracts.input_verification,
            config.contracts.decryption,
        );
        Self {
            config,
            transport,
            chain,
            domains,
            signers: Arc::new(signers),
            abort: None,
        }
    }

    /// Every request issued by this client stops once `signal` fires
    pub fn with_abort_signal(mut self, signal: AbortSignal) -> Self {
        self.abort = Some(signal);
        self
    }

    pub fn config(&self) -> &RelayerConfig {
        &self.config
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    pub fn signer_sets(&self) -> &SignerSets {
        &self.signers
    }

    fn request<T: DeserializeOwned>(
        &self,
        operation: RelayerOperation,
        payload: &impl Serialize,
    ) -> Result<RelayerRequest<T>, ClientError> {
        let request = RelayerRequest::new(
            operation,
            &self.config.relayer_url,
            payload,
            self.transport.clone(),
            self.config.request.clone(),
        )?;
        Ok(match &self.abort {
            Some(signal) => request.with_abort_signal(signal.clone()),
            None => request,
        })
    }

    /// Submit `input` for verification by the coprocessors and return the proof to pass
    /// on-chain alongside its handles.
    #[instrument(name = "input_proof", skip_all)]
    pub async fn request_input_proof(
        &self,
        input: &EncryptedInput,
        contract_address: &str,
        user_address: &str,
    ) -> Result<InputProof, ClientError> {
        let contract = parse_checksummed_address("contractAddress", contract_address)?;
        let user = parse_checksummed_address("userAddress", user_address)?;
        let expected = derive_handles(
            &input.ciphertext_with_proof,
            &input.type_ids,
            self.config.contracts.acl,
            U256::from(self.config.host_chain_id),
            self.config.handle_version,
        )?;
        let extra_data = to_hex(&input.extra_data);
        let message = CiphertextVerificationFields {
            handles: &expected,
            user_address,
            contract_address,
            contract_chain_id: self.config.host_chain_id,
            extra_data: &extra_data,
        }
        .build(&self.domains.input_verification)?;

        let payload = InputProofPayload {
            contract_address: contract.to_checksum(None),
            user_address: user.to_checksum(None),
            ciphertext_with_input_verification: input.ciphertext_with_proof.clone(),
            contract_chain_id: chain_id_quantity(self.config.host_chain_id),
            extra_data: input.extra_data.clone(),
        };
        let result: InputProofResult = self
            .request(RelayerOperation::InputProof, &payload)?
            .run()
            .await?;

        if !result.accepted {
            return Err(ClientError::InputProofRejected);
        }
        check_handles(&expected, &result.handles)?;
        if let Some(found) = result.extra_data {
            if found != input.extra_data {
                return Err(ClientError::ExtraDataMismatch {
                    expected: input.extra_data.clone(),
                    found,
                });
            }
        }

        let proof = compute_input_proof(result.signatures, message, &self.signers.coprocessors)?;
        info!(
            handles = proof.handles.len(),
            signatures = proof.signatures.len(),
            "input proof verified"
        );
        Ok(proof)
    }

    #[instrument(name = "public_decrypt", skip_all)]
    pub async fn public_decrypt(
        &self,
        handles: &[Handle],
    ) -> Result<PublicDecryption, ClientError> {
        if handles.is_empty() {
            return Err(ValidationError::Empty {
                field: "ciphertextHandles".to_string(),
            }
            .into());
        }
        for handle in handles {
            handle.type_id()?;
        }
        for handle in handles {
            if !self.chain.is_publicly_decryptable(*handle).await? {
                return Err(ClientError::NotDecryptable(*handle));
            }
        }

        let extra_data = Bytes::from_static(&[0x00]);
        let payload = PublicDecryptPayload {
            ciphertext_handles: handles.to_vec(),
            extra_data: extra_data.clone(),
        };
        let result: PublicDecryptResult = self
            .request(RelayerOperation::PublicDecrypt, &payload)?
            .run()
            .await?;

        let extra_data = result.extra_data.unwrap_or(extra_data);
        let signed = public_decrypt_message(
            &self.domains.decryption,
            handles,
            result.decrypted_value.clone(),
            extra_data.clone(),
        )
        .with_signatures(result.signatures.clone());
        verify_signed(&signed, &self.signers.kms)?;

        let values = decode_clear_values(handles, &result.decrypted_value)?;
        info!(values = values.len(), "public decryption verified");
        Ok(PublicDecryption {
            values,
            decrypted_result: result.decrypted_value,
            signatures: result.signatures,
            extra_data,
        })
    }

    /// Have the KMS re-encrypt handles for the user, verify every share and recombine them
    /// with `decryptor`.
    #[instrument(name = "user_decrypt", skip_all)]
    pub async fn user_decrypt(
        &self,
        request: &UserDecryptRequest,
        decryptor: &dyn ShareDecryptor,
    ) -> Result<Vec<ClearValue>, ClientError> {
        if request.handle_contract_pairs.is_empty() {
            return Err(ValidationError::Empty {
                field: "handleContractPairs".to_string(),
            }
            .into());
        }
        let user = parse_checksummed_address("userAddress", &request.user_address)?;
        let delegator = request
            .delegator_address
            .as_deref()
            .map(|d| parse_checksummed_address("delegatorAddress", d))
            .transpose()?;
        let owner = delegator.unwrap_or(user);

        let contract_refs: Vec<&str> = request
            .contract_addresses
            .iter()
            .map(String::as_str)
            .collect();
        let fields = UserDecryptFields {
            public_key: &request.public_key,
            contract_addresses: &contract_refs,
            start_timestamp: request.start_timestamp,
            duration_days: request.duration_days,
            extra_data: &request.extra_data,
        };
        let (signing_hash, authorized, public_key, extra_data) = match &request.delegator_address {
            Some(delegator) => {
                let signed = fields.build_delegated(delegator, &self.domains.decryption)?;
                (
                    signed.signing_hash(),
                    signed.message.contractAddresses,
                    signed.message.publicKey,
                    signed.message.extraData,
                )
            }
            None => {
                let signed = fields.build(&self.domains.decryption)?;
                (
                    signed.signing_hash(),
                    signed.message.contractAddresses,
                    signed.message.publicKey,
                    signed.message.extraData,
                )
            }
        };

        let signature: Bytes = parse_prefixed_hex("signature", &request.signature)
            .map_err(ValidationError::from)?
            .into();
        let signer = recover_signer(&signing_hash, &signature, 0)?;
        if signer != user {
            return Err(ClientError::UserSignatureMismatch {
                expected: user,
                found: signer,
            });
        }

        let expires_at = request
            .start_timestamp
            .saturating_add(request.duration_days.saturating_mul(SECONDS_PER_DAY));
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        if now >= expires_at {
            return Err(ClientError::AuthorizationExpired(expires_at));
        }

        let mut handles = Vec::with_capacity(request.handle_contract_pairs.len());
        let mut pairs = Vec::with_capacity(request.handle_contract_pairs.len());
        for (handle, contract) in &request.handle_contract_pairs {
            let contract =
                parse_checksummed_address("handleContractPairs.contractAddress", contract)?;
            handle.type_id()?;
            if !authorized.contains(&contract) {
                return Err(ClientError::ContractNotAuthorized {
                    handle: *handle,
                    contract,
                });
            }
            self.ensure_allowed(*handle, owner).await?;
            self.ensure_allowed(*handle, contract).await?;
            handles.push(*handle);
            pairs.push(HandleContractPair {
                handle: *handle,
                contract_address: contract.to_checksum(None),
            });
        }

        let payload = UserDecryptPayload {
            handle_contract_pairs: pairs,
            request_validity: RequestValidity {
                start_timestamp: request.start_timestamp.to_string(),
                duration_days: request.duration_days.to_string(),
            },
            contracts_chain_id: chain_id_quantity(self.config.host_chain_id),
            contract_addresses: authorized.iter().map(|a| a.to_checksum(None)).collect(),
            user_address: user.to_checksum(None),
            delegator_address: delegator.map(|d| d.to_checksum(None)),
            signature,
            public_key: public_key.clone(),
            extra_data,
        };
        let operation = match delegator {
            Some(_) => RelayerOperation::DelegatedUserDecrypt,
            None => RelayerOperation::UserDecrypt,
        };
        let shares: Vec<UserDecryptShare> = self.request(operation, &payload)?.run().await?;

        let verified = self.verify_shares(&public_key, &handles, shares)?;
        let words = decryptor
            .reconstruct(&handles, &verified)
            .map_err(ClientError::Decryptor)?;
        if words.len() != handles.len() {
            return Err(ClientError::Decryptor(anyhow!(
                "reconstructed {} values for {} handles",
                words.len(),
                handles.len()
            )));
        }

        let values = handles
            .iter()
            .zip(words)
            .enumerate()
            .map(|(index, (handle, word))| -> Result<ClearValue, ClientError> {
                Ok(ClearValue::from_word(handle.type_id()?, word, index)?)
            })
            .collect::<Result<Vec<_>, _>>()?;
        info!(values = values.len(), shares = verified.len(), "user decryption verified");
        Ok(values)
    }

    async fn ensure_allowed(&self, handle: Handle, account: Address) -> Result<(), ClientError> {
        if !self.chain.is_allowed(handle, account).await? {
            return Err(ClientError::NotAllowed { handle, account });
        }
        Ok(())
    }

    /// Each share carries exactly one KMS signature over its own payload. Together the signers
    /// must be distinct members of the KMS set and reach its threshold.
    fn verify_shares(
        &self,
        public_key: &Bytes,
        handles: &[Handle],
        shares: Vec<UserDecryptShare>,
    ) -> Result<Vec<VerifiedShare>, ClientError> {
        let mut verified = Vec::with_capacity(shares.len());
        for (index, share) in shares.into_iter().enumerate() {
            let message = user_decrypt_response_message(
                &self.domains.decryption,
                public_key.clone(),
                handles,
                share.payload.clone(),
                share.extra_data.clone(),
            );
            let signer = recover_signer(&message.signing_hash(), &share.signature, index)?;
            verified.push(VerifiedShare {
                signer,
                payload: share.payload,
                extra_data: share.extra_data,
            });
        }
        let signers: Vec<Address> = verified.iter().map(|s| s.signer).collect();
        verify_threshold(&signers, &self.signers.kms)?;
        Ok(verified)
    }
}

fn check_handles(expected: &[Handle], found: &[Handle]) -> Result<(), ClientError> {
    if expected.len() != found.len() {
        return Err(ClientError::HandleCountMismatch {
            expected: expected.len(),
            found: found.len(),
        });
    }
    match expected.iter().zip(found).position(|(e, f)| e != f) {
        Some(index) => Err(ClientError::HandleMismatch {
            index,
            expected: expected[index],
            found: found[index],
        }),
        None => Ok(()),
    }
}
