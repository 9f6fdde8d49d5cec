// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::ClientError;
use alloy::{
    primitives::{Address, B256, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    sol,
};
use async_trait::async_trait;
use fhr_config::{ContractAddresses, RelayerConfig};
use fhr_handle::Handle;
use thiserror::Error;
use tracing::debug;
use url::Url;

sol! {
    #[sol(rpc)]
    contract InputVerifier {
        function getCoprocessorSigners() external view returns (address[] memory);
        function getThreshold() external view returns (uint256);
    }

    #[sol(rpc)]
    contract KMSVerifier {
        function getKmsSigners() external view returns (address[] memory);
        function getThreshold() external view returns (uint256);
    }

    #[sol(rpc)]
    contract ACL {
        function isAllowedForDecryption(bytes32 handle) external view returns (bool);
        function persistAllowed(bytes32 handle, address account) external view returns (bool);
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Chain call {call} failed: {reason}")]
pub struct ChainError {
    pub call: &'static str,
    pub reason: String,
}

impl ChainError {
    pub fn new(call: &'static str, reason: impl ToString) -> Self {
        Self {
            call,
            reason: reason.to_string(),
        }
    }
}

/// Signer addresses and threshold as registered on the host chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerSetInfo {
    pub signers: Vec<Address>,
    pub threshold: usize,
}

/// Read-only view of the host chain contracts the client trusts
#[async_trait]
pub trait ChainStateReader: Send + Sync {
    async fn coprocessor_signers(&self) -> Result<SignerSetInfo, ChainError>;

    async fn kms_signers(&self) -> Result<SignerSetInfo, ChainError>;

    async fn is_publicly_decryptable(&self, handle: Handle) -> Result<bool, ChainError>;

    async fn is_allowed(&self, handle: Handle, account: Address) -> Result<bool, ChainError>;
}

/// [`ChainStateReader`] over json-rpc contract calls
#[derive(Clone)]
pub struct ContractChainReader {
    provider: DynProvider,
    contracts: ContractAddresses,
}

impl ContractChainReader {
    pub async fn connect(rpc_url: &Url, contracts: ContractAddresses) -> Result<Self, ChainError> {
        let provider = ProviderBuilder::new()
            .connect(rpc_url.as_str())
            .await
            .map_err(|e| ChainError::new("connect", e))?
            .erased();
        Ok(Self::with_provider(provider, contracts))
    }

    /// Connect to the configured `rpc_url`
    pub async fn from_config(config: &RelayerConfig) -> Result<Self, ClientError> {
        let rpc_url = config.rpc_url().map_err(ClientError::Config)?;
        Ok(Self::connect(rpc_url, config.contracts).await?)
    }

    pub fn with_provider(provider: DynProvider, contracts: ContractAddresses) -> Self {
        Self {
            provider,
            contracts,
        }
    }
}

fn threshold(call: &'static str, value: U256) -> Result<usize, ChainError> {
    usize::try_from(value)
        .map_err(|_| ChainError::new(call, format!("threshold {value} overflows")))
}

#[async_trait]
impl ChainStateReader for ContractChainReader {
    async fn coprocessor_signers(&self) -> Result<SignerSetInfo, ChainError> {
        let contract = InputVerifier::new(self.contracts.input_verifier, &self.provider);
        let signers = contract
            .getCoprocessorSigners()
            .call()
            .await
            .map_err(|e| ChainError::new("getCoprocessorSigners", e))?;
        let value = contract
            .getThreshold()
            .call()
            .await
            .map_err(|e| ChainError::new("InputVerifier.getThreshold", e))?;
        debug!(signers = signers.len(), threshold = %value, "read coprocessor signers");
        Ok(SignerSetInfo {
            signers,
            threshold: threshold("InputVerifier.getThreshold", value)?,
        })
    }

    async fn kms_signers(&self) -> Result<SignerSetInfo, ChainError> {
        let contract = KMSVerifier::new(self.contracts.kms_verifier, &self.provider);
        let signers = contract
            .getKmsSigners()
            .call()
            .await
            .map_err(|e| ChainError::new("getKmsSigners", e))?;
        let value = contract
            .getThreshold()
            .call()
            .await
            .map_err(|e| ChainError::new("KMSVerifier.getThreshold", e))?;
        debug!(signers = signers.len(), threshold = %value, "read kms signers");
        Ok(SignerSetInfo {
            signers,
            threshold: threshold("KMSVerifier.getThreshold", value)?,
        })
    }

    async fn is_publicly_decryptable(&self, handle: Handle) -> Result<bool, ChainError> {
        ACL::new(self.contracts.acl, &self.provider)
            .isAllowedForDecryption(B256::from(handle))
            .call()
            .await
            .map_err(|e| ChainError::new("isAllowedForDecryption", e))
    }

    async fn is_allowed(&self, handle: Handle, account: Address) -> Result<bool, ChainError> {
        ACL::new(self.contracts.acl, &self.provider)
            .persistAllowed(B256::from(handle), account)
            .call()
            .await
            .map_err(|e| ChainError::new("persistAllowed", e))
    }
}
