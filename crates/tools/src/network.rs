//! LUKSO networks and their connection parameters.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::config::ConfigError;

/// Environment variable holding the deployer's private key
pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";

/// LUKSO networks contracts can be deployed to
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    /// LUKSO Testnet
    #[default]
    LuksoTestnet,
    /// LUKSO Mainnet
    LuksoMainnet,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::LuksoTestnet, Network::LuksoMainnet];

    /// Get network name as used in the framework configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::LuksoTestnet => "lukso_testnet",
            Network::LuksoMainnet => "lukso_mainnet",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::LuksoTestnet => 4201,
            Network::LuksoMainnet => 42,
        }
    }

    /// Get default RPC URL for this network
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::LuksoTestnet => "https://rpc.testnet.lukso.network/",
            Network::LuksoMainnet => "https://rpc.mainnet.lukso.network",
        }
    }

    /// Environment variable overriding this network's RPC URL
    pub fn rpc_url_var(&self) -> &'static str {
        match self {
            Network::LuksoTestnet => "LUKSO_TESTNET_RPC_URL",
            Network::LuksoMainnet => "LUKSO_MAINNET_RPC_URL",
        }
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lukso_testnet" | "testnet" => Ok(Network::LuksoTestnet),
            "lukso_mainnet" | "mainnet" => Ok(Network::LuksoMainnet),
            other => Err(ConfigError::InvalidNetwork(other.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const MASK_MIN_LEN: usize = 32;

/// Signing credential for a network.
///
/// The key never shows up in `Debug` or `Display` output, only in
/// serialized exports.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Account(String);

impl Account {
    pub fn new(key: impl Into<String>) -> Self {
        Account(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Short form keeping the first six and last four characters.
    ///
    /// Keys under 32 characters are starred out entirely.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() < MASK_MIN_LEN {
            return "*".repeat(chars.len().max(4));
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}…{tail}")
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Account").field(&self.masked()).finish()
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl Serialize for Account {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Accounts for a network given the raw `PRIVATE_KEY` value.
///
/// An unset or empty key yields no accounts.
pub fn accounts_from_private_key(private_key: Option<&str>) -> Vec<Account> {
    match private_key {
        Some(key) if !key.is_empty() => vec![Account::new(key)],
        _ => Vec::new(),
    }
}

/// Connection parameters for one network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub url: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl NetworkConfig {
    pub fn for_network(network: Network, accounts: Vec<Account>) -> Self {
        NetworkConfig {
            chain_id: network.chain_id(),
            url: network.default_rpc_url().to_string(),
            accounts,
        }
    }

    /// Parse and check the RPC URL
    pub fn rpc_url(&self) -> Result<Url, ConfigError> {
        parse_http_url(&self.url)
    }
}

/// Parse a URL that must use http or https and carry a host
pub(crate) fn parse_http_url(raw: &str) -> Result<Url, ConfigError> {
    let parsed = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConfigError::InvalidUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme {other}, expected http:// or https://"),
            })
        }
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: "URL must contain a host".to_string(),
        });
    }

    Ok(parsed)
}
