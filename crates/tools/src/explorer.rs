//! Contract verification on the LUKSO block explorers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::ConfigError;
use crate::network::{parse_http_url, Network};

/// Blockscout accepts any key, the verification plugin only needs one set
pub const PLACEHOLDER_API_KEY: &str = "empty";

impl Network {
    pub fn explorer_api_url(&self) -> &'static str {
        match self {
            Network::LuksoTestnet => "https://explorer.execution.testnet.lukso.network/api",
            Network::LuksoMainnet => "https://explorer.execution.mainnet.lukso.network/api",
        }
    }

    pub fn explorer_browser_url(&self) -> &'static str {
        match self {
            Network::LuksoTestnet => "https://explorer.execution.testnet.lukso.network",
            Network::LuksoMainnet => "https://explorer.execution.mainnet.lukso.network",
        }
    }
}

/// Sourcify verification toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcifyConfig {
    pub enabled: bool,
}

impl Default for SourcifyConfig {
    fn default() -> Self {
        SourcifyConfig { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainUrls {
    #[serde(rename = "apiURL")]
    pub api_url: String,
    #[serde(rename = "browserURL")]
    pub browser_url: String,
}

/// Explorer descriptor for a chain the verification plugin doesn't know
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomChain {
    pub network: String,
    pub chain_id: u64,
    pub urls: ChainUrls,
}

impl CustomChain {
    pub fn for_network(network: Network) -> Self {
        CustomChain {
            network: network.as_str().to_string(),
            chain_id: network.chain_id(),
            urls: ChainUrls {
                api_url: network.explorer_api_url().to_string(),
                browser_url: network.explorer_browser_url().to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtherscanConfig {
    pub api_key: BTreeMap<String, String>,
    pub custom_chains: Vec<CustomChain>,
}

impl Default for EtherscanConfig {
    fn default() -> Self {
        // Mainnet first, matching the order the explorers were registered in.
        let networks = [Network::LuksoMainnet, Network::LuksoTestnet];
        EtherscanConfig {
            api_key: networks
                .iter()
                .map(|n| (n.as_str().to_string(), PLACEHOLDER_API_KEY.to_string()))
                .collect(),
            custom_chains: networks.into_iter().map(CustomChain::for_network).collect(),
        }
    }
}

impl EtherscanConfig {
    pub fn custom_chain(&self, network: &str) -> Option<&CustomChain> {
        self.custom_chains.iter().find(|c| c.network == network)
    }

    /// Check that `network` can be verified: it needs an API key and a
    /// custom chain carrying the same chain id.
    pub fn check_network(&self, network: &str, chain_id: u64) -> Result<(), ConfigError> {
        if !self.api_key.contains_key(network) {
            return Err(ConfigError::MissingVerification {
                network: network.to_string(),
                entry: "apiKey",
            });
        }

        let chain = self
            .custom_chain(network)
            .ok_or_else(|| ConfigError::MissingVerification {
                network: network.to_string(),
                entry: "customChains",
            })?;

        if chain.chain_id != chain_id {
            return Err(ConfigError::ChainMismatch {
                network: network.to_string(),
                expected: chain_id,
                found: chain.chain_id,
            });
        }

        Ok(())
    }

    /// Check explorer URLs and that no network is listed twice
    pub fn validate_urls(&self) -> Result<(), ConfigError> {
        for (i, chain) in self.custom_chains.iter().enumerate() {
            if self.custom_chains[..i].iter().any(|c| c.network == chain.network) {
                return Err(ConfigError::ValidationError(format!(
                    "custom chain {} is listed more than once",
                    chain.network
                )));
            }
            parse_http_url(&chain.urls.api_url)?;
            parse_http_url(&chain.urls.browser_url)?;
        }
        Ok(())
    }
}
