// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{validation::http_url, ContractAddresses, ContractsConfig};
use alloy::primitives::Address;
use anyhow::{bail, Context, Result};
use fhr_request::RequestOptions;
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_HOST_CHAIN_ID: u64 = 11_155_111;
pub const DEFAULT_GATEWAY_CHAIN_ID: u64 = 10_901;

/// Configuration as it is layered from defaults, file and environment, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayerConfigFile {
    pub relayer_url: Option<String>,
    pub api_key: Option<String>,
    /// Host chain json-rpc endpoint used to read signer sets and ACL state
    pub rpc_url: Option<String>,
    pub host_chain_id: u64,
    pub gateway_chain_id: u64,
    pub contracts: ContractsConfig,
    pub handle_version: u8,
    pub request: RequestOptions,
}

impl Default for RelayerConfigFile {
    fn default() -> Self {
        Self {
            relayer_url: None,
            api_key: None,
            rpc_url: None,
            host_chain_id: DEFAULT_HOST_CHAIN_ID,
            gateway_chain_id: DEFAULT_GATEWAY_CHAIN_ID,
            contracts: ContractsConfig::default(),
            handle_version: 0,
            request: RequestOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayerConfig {
    pub relayer_url: Url,
    pub api_key: Option<String>,
    pub rpc_url: Option<Url>,
    pub host_chain_id: u64,
    pub gateway_chain_id: u64,
    pub contracts: ContractAddresses,
    pub handle_version: u8,
    pub request: RequestOptions,
}

impl RelayerConfig {
    pub fn rpc_url(&self) -> Result<&Url> {
        self.rpc_url
            .as_ref()
            .context("rpc_url is required to read chain state")
    }

    pub fn acl(&self) -> Address {
        self.contracts.acl
    }
}

impl TryFrom<RelayerConfigFile> for RelayerConfig {
    type Error = anyhow::Error;

    fn try_from(file: RelayerConfigFile) -> Result<Self> {
        let Some(relayer_url) = file.relayer_url.as_deref() else {
            bail!("relayer_url is not set");
        };
        if file.host_chain_id == 0 || file.gateway_chain_id == 0 {
            bail!("host_chain_id and gateway_chain_id must be non-zero");
        }
        if file.request.max_submit_attempts == 0 || file.request.max_poll_attempts == 0 {
            bail!("request.max_submit_attempts and request.max_poll_attempts must be non-zero");
        }
        let rpc_url = file
            .rpc_url
            .as_deref()
            .map(|url| http_url("rpc_url", url))
            .transpose()?;

        Ok(Self {
            relayer_url: http_url("relayer_url", relayer_url)?,
            api_key: file.api_key.filter(|key| !key.is_empty()),
            rpc_url,
            host_chain_id: file.host_chain_id,
            gateway_chain_id: file.gateway_chain_id,
            contracts: ContractAddresses::try_from(&file.contracts)?,
            handle_version: file.handle_version,
            request: file.request,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::load_config;
    use alloy::primitives::address;
    use figment::Jail;
    use std::time::Duration;

    const CONFIG: &str = r#"
relayer_url: "https://relayer.testnet.example"
api_key: "secret"
host_chain_id: 11155111
gateway_chain_id: 10901
contracts:
  acl: "0x687820221192C5B662b25367F70076A37bc79b6c"
  input_verifier: "0xbc91f3daD1A5F19F8390c400196e58073B6a0BC4"
  kms_verifier: "0x1364cBBf2cDF5032C47d8226a6f6FBD2AFCDacAC"
  input_verification: "0x812b06e1CDCE800494b79fFE4f925A504a9A9810"
  decryption: "0xb6E160B1ff80D67Bfe90A85eE06Ce0A2613607D1"
request:
  min_retry_delay_ms: 500
  timeout_ms: 30000
  call_timeout_ms: 5000
"#;

    #[test]
    fn test_load_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file("relayer.config.yaml", CONFIG)?;
            let config =
                load_config(jail.directory(), None).map_err(|e| format!("{e:#}"))?;

            assert_eq!(config.relayer_url.as_str(), "https://relayer.testnet.example/");
            assert_eq!(config.api_key.as_deref(), Some("secret"));
            assert_eq!(config.host_chain_id, 11_155_111);
            assert_eq!(
                config.acl(),
                address!("0x687820221192C5B662b25367F70076A37bc79b6c")
            );
            assert_eq!(
                config.contracts.decryption,
                address!("0xb6E160B1ff80D67Bfe90A85eE06Ce0A2613607D1")
            );
            assert_eq!(config.request.min_retry_delay(), Duration::from_millis(500));
            assert_eq!(config.request.timeout(), Some(Duration::from_secs(30)));
            assert_eq!(config.request.call_timeout(), Some(Duration::from_secs(5)));
            assert_eq!(config.request.max_poll_attempts, 120);
            assert!(config.rpc_url().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_file_found_in_parent_directory() {
        Jail::expect_with(|jail| {
            jail.create_file("relayer.config.yaml", CONFIG)?;
            jail.create_dir("nested/deeper")?;
            let cwd = jail.directory().join("nested/deeper");
            let config = load_config(&cwd, None).map_err(|e| format!("{e:#}"))?;
            assert_eq!(config.gateway_chain_id, 10_901);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("relayer.config.yaml", CONFIG)?;
            jail.set_env("FHR_RELAYER_URL", "http://localhost:3000");
            jail.set_env("FHR_REQUEST__MAX_POLL_ATTEMPTS", "5");
            jail.set_env("FHR_RPC_URL", "http://localhost:8545");
            let config =
                load_config(jail.directory(), None).map_err(|e| format!("{e:#}"))?;

            assert_eq!(config.relayer_url.as_str(), "http://localhost:3000/");
            assert_eq!(config.request.max_poll_attempts, 5);
            assert_eq!(config.request.min_retry_delay_ms, 500);
            assert_eq!(
                config.rpc_url().map_err(|e| e.to_string())?.as_str(),
                "http://localhost:8545/"
            );
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path() {
        Jail::expect_with(|jail| {
            jail.create_dir("conf")?;
            jail.create_file("conf/custom.yaml", CONFIG)?;
            let config = load_config(
                jail.directory(),
                Some(std::path::Path::new("conf/custom.yaml")),
            )
            .map_err(|e| format!("{e:#}"))?;
            assert_eq!(config.handle_version, 0);

            let missing = load_config(jail.directory(), Some(std::path::Path::new("nope.yaml")));
            assert!(format!("{:#}", missing.unwrap_err()).contains("not found"));
            Ok(())
        });
    }

    #[test]
    fn test_missing_values_are_reported() {
        Jail::expect_with(|jail| {
            let err = load_config(jail.directory(), None).unwrap_err();
            assert_eq!(err.to_string(), "relayer_url is not set");

            jail.set_env("FHR_RELAYER_URL", "https://relayer.testnet.example");
            let err = load_config(jail.directory(), None).unwrap_err();
            assert_eq!(err.to_string(), "contracts.acl is not set");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "relayer.config.yaml",
                &CONFIG.replace(
                    "0x687820221192C5B662b25367F70076A37bc79b6c",
                    "0x687820221192c5b662b25367f70076a37bc79b6c",
                ),
            )?;
            let err = load_config(jail.directory(), None).unwrap_err();
            assert!(err.to_string().contains("contracts.acl must be an EIP-55"));
            Ok(())
        });

        Jail::expect_with(|jail| {
            jail.create_file(
                "relayer.config.yaml",
                &format!("{CONFIG}\nunknown_key: 1\n"),
            )?;
            assert!(load_config(jail.directory(), None).is_err());
            Ok(())
        });

        Jail::expect_with(|jail| {
            jail.create_file("relayer.config.yaml", CONFIG)?;
            jail.set_env("FHR_RELAYER_URL", "ftp://relayer.example");
            assert!(load_config(jail.directory(), None).is_err());
            Ok(())
        });
    }
}
