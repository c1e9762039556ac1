//! Deployment configuration for the LUKSO networks
//!
//! The configuration mirrors the framework's user config: networks,
//! compiler settings and contract verification. Values are resolved in
//! priority order:
//!
//! 1. Built-in network, compiler and explorer literals
//! 2. lukso.toml overrides (path from `LUKSO_CONFIG`)
//! 3. Environment variables (`LUKSO_*_RPC_URL`, `LUKSO_NETWORK`)
//!
//! Signing credentials only ever come from `PRIVATE_KEY`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use lukso_tools::config::Config;
//! use lukso_tools::network::Network;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let testnet = config.network(Network::LuksoTestnet).unwrap();
//! println!("Chain id: {}", testnet.chain_id);
//! println!("RPC URL: {}", testnet.url);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::explorer::{EtherscanConfig, SourcifyConfig};
use crate::network::{accounts_from_private_key, Account, Network, NetworkConfig, PRIVATE_KEY_VAR};
use crate::solidity::SolidityConfig;

/// Environment variable pointing at the override file
pub const CONFIG_PATH_VAR: &str = "LUKSO_CONFIG";

/// Environment variable selecting the default network
pub const NETWORK_VAR: &str = "LUKSO_NETWORK";

pub const DEFAULT_CONFIG_FILE: &str = "lukso.toml";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON serialize error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid network: {0}. Must be: lukso_testnet or lukso_mainnet")]
    InvalidNetwork(String),

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid compiler version {version}: {reason}")]
    InvalidCompilerVersion { version: String, reason: String },

    #[error("Network {network} has no {entry} entry for explorer verification")]
    MissingVerification {
        network: String,
        entry: &'static str,
    },

    #[error("Chain id mismatch for {network}: network uses {expected}, explorer entry uses {found}")]
    ChainMismatch {
        network: String,
        expected: u64,
        found: u64,
    },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Per-network section of lukso.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkOverride {
    #[serde(default)]
    pub url: Option<String>,
}

/// Contents of lukso.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverrideFile {
    #[serde(default)]
    pub default_network: Option<String>,
    #[serde(default)]
    pub network: BTreeMap<String, NetworkOverride>,
}

impl OverrideFile {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Resolved deployment configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// Keyed by network so exports list testnet before mainnet
    pub networks: BTreeMap<Network, NetworkConfig>,
    pub solidity: SolidityConfig,
    pub sourcify: SourcifyConfig,
    pub etherscan: EtherscanConfig,
    /// Network picked when a command doesn't name one
    #[serde(skip)]
    pub default_network: Network,
}

impl Config {
    /// Build the configuration from the built-in literals.
    ///
    /// `private_key` becomes the single signing account of every network;
    /// `None` or an empty key leaves the account lists empty.
    pub fn new(private_key: Option<&str>) -> Self {
        let networks = Network::ALL
            .into_iter()
            .map(|network| {
                let accounts = accounts_from_private_key(private_key);
                (network, NetworkConfig::for_network(network, accounts))
            })
            .collect();

        Config {
            networks,
            solidity: SolidityConfig::default(),
            sourcify: SourcifyConfig::default(),
            etherscan: EtherscanConfig::default(),
            default_network: Network::LuksoTestnet,
        }
    }

    /// Load configuration from `.env`, the process environment and lukso.toml
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - lukso.toml exists but cannot be read or parsed
    /// - an override names an unknown network
    /// - the resolved configuration fails validation
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (non-fatal)
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }

        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self::load_from(&path, |key| std::env::var(key).ok())
    }

    /// Load from an override file path and an environment lookup.
    ///
    /// Unlike [`Config::load`] this never reads `.env`.
    pub fn load_from<F>(path: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides = Self::load_overrides(path)?;
        Self::resolve(overrides.as_ref(), env)
    }

    /// Read lukso.toml; a missing file means no overrides
    pub fn load_overrides(path: &Path) -> Result<Option<OverrideFile>, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no override file");
            return Ok(None);
        }
        info!(path = %path.display(), "applying override file");
        OverrideFile::from_path(path).map(Some)
    }

    /// Resolve the configuration from overrides and an environment lookup
    pub fn resolve<F>(overrides: Option<&OverrideFile>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let private_key = env(PRIVATE_KEY_VAR);
        if private_key.as_deref().map_or(true, str::is_empty) {
            debug!("{PRIVATE_KEY_VAR} not set, networks have no accounts");
        }
        let mut config = Config::new(private_key.as_deref());

        if let Some(file) = overrides {
            config.apply_overrides(file)?;
        }

        for network in Network::ALL {
            if let Some(url) = env(network.rpc_url_var()) {
                debug!(%network, %url, "RPC URL from environment");
                config.set_rpc_url(network, url);
            }
        }

        if let Some(name) = env(NETWORK_VAR) {
            config.default_network = name.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, file: &OverrideFile) -> Result<(), ConfigError> {
        for (name, section) in &file.network {
            let network: Network = name.parse()?;
            if let Some(url) = &section.url {
                debug!(%network, %url, "RPC URL from override file");
                self.set_rpc_url(network, url.clone());
            }
        }

        if let Some(name) = &file.default_network {
            self.default_network = name.parse()?;
        }

        Ok(())
    }

    fn set_rpc_url(&mut self, network: Network, url: String) {
        if let Some(entry) = self.networks.get_mut(&network) {
            entry.url = url;
        }
    }

    pub fn network(&self, network: Network) -> Option<&NetworkConfig> {
        self.networks.get(&network)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut chain_ids = HashSet::new();
        for (network, config) in &self.networks {
            if !chain_ids.insert(config.chain_id) {
                return Err(ConfigError::ValidationError(format!(
                    "chain id {} of {network} is used by more than one network",
                    config.chain_id
                )));
            }
        }

        for (network, config) in &self.networks {
            config.rpc_url()?;
            self.etherscan.check_network(network.as_str(), config.chain_id)?;
        }

        let declared = |name: &str| self.networks.keys().any(|n| n.as_str() == name);
        if let Some(name) = self.etherscan.api_key.keys().find(|n| !declared(n.as_str())) {
            return Err(ConfigError::ValidationError(format!(
                "apiKey entry {name} has no matching network"
            )));
        }
        if let Some(chain) = self
            .etherscan
            .custom_chains
            .iter()
            .find(|c| !declared(c.network.as_str()))
        {
            return Err(ConfigError::ValidationError(format!(
                "custom chain {} has no matching network",
                chain.network
            )));
        }

        self.etherscan.validate_urls()?;
        self.solidity.validate()?;

        Ok(())
    }

    /// Copy of the configuration with every account masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        for network in config.networks.values_mut() {
            for account in network.accounts.iter_mut() {
                *account = Account::new(account.masked());
            }
        }
        config
    }

    /// Get configuration as JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Get configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Human readable summary, accounts masked. `only` limits the network list.
    pub fn summary(&self, only: Option<Network>) -> Summary<'_> {
        Summary { config: self, only }
    }

    /// Print the resolved configuration
    pub fn print_summary(&self, only: Option<Network>) {
        print!("{}", self.summary(only));
    }
}

/// Display form of a [`Config`], see [`Config::summary`]
pub struct Summary<'a> {
    config: &'a Config,
    only: Option<Network>,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.config;
        writeln!(f, "LUKSO deployment configuration")?;
        writeln!(f, "  Default network:   {}", config.default_network)?;

        for (network, entry) in &config.networks {
            if self.only.is_some_and(|n| n != *network) {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "  [{network}]")?;
            writeln!(f, "  Chain ID:          {}", entry.chain_id)?;
            writeln!(f, "  RPC URL:           {}", entry.url)?;
            if entry.accounts.is_empty() {
                writeln!(f, "  Accounts:          (not configured)")?;
            } else {
                let masked: Vec<String> = entry.accounts.iter().map(Account::masked).collect();
                writeln!(f, "  Accounts:          {}", masked.join(", "))?;
            }
            if let Some(chain) = config.etherscan.custom_chain(network.as_str()) {
                writeln!(f, "  Explorer API:      {}", chain.urls.api_url)?;
                writeln!(f, "  Explorer:          {}", chain.urls.browser_url)?;
            }
        }

        let optimizer = &config.solidity.settings.optimizer;
        writeln!(f)?;
        writeln!(f, "  Solidity:          {}", config.solidity.version)?;
        if optimizer.enabled {
            writeln!(f, "  Optimizer:         enabled ({} runs)", optimizer.runs)?;
        } else {
            writeln!(f, "  Optimizer:         disabled")?;
        }
        let sourcify = if config.sourcify.enabled { "enabled" } else { "disabled" };
        writeln!(f, "  Sourcify:          {sourcify}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::CustomChain;
    use std::collections::HashMap;

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_no_private_key() {
        let config = Config::resolve(None, env_of(&[])).unwrap();
        for network in Network::ALL {
            assert!(config.network(network).unwrap().accounts.is_empty());
        }
    }

    #[test]
    fn test_empty_private_key() {
        let config = Config::resolve(None, env_of(&[("PRIVATE_KEY", "")])).unwrap();
        assert!(config.networks.values().all(|n| n.accounts.is_empty()));
    }

    #[test]
    fn test_private_key_on_every_network() {
        let config = Config::resolve(None, env_of(&[("PRIVATE_KEY", "0xfeedbeef")])).unwrap();
        for network in Network::ALL {
            assert_eq!(
                config.network(network).unwrap().accounts,
                vec![Account::new("0xfeedbeef")]
            );
        }
    }

    #[test]
    fn test_literals() {
        let config = Config::new(None);
        let testnet = config.network(Network::LuksoTestnet).unwrap();
        assert_eq!(testnet.chain_id, 4201);
        assert_eq!(testnet.url, "https://rpc.testnet.lukso.network/");
        let mainnet = config.network(Network::LuksoMainnet).unwrap();
        assert_eq!(mainnet.chain_id, 42);
        assert_eq!(mainnet.url, "https://rpc.mainnet.lukso.network");
        assert_eq!(config.solidity.version, "0.8.20");
        assert_eq!(config.solidity.settings.optimizer.runs, 1);
        assert!(config.sourcify.enabled);
        assert_eq!(config.default_network, Network::LuksoTestnet);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::new(Some("0x01")).validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_fails() {
        let mut config = Config::new(None);
        config.etherscan.api_key.remove("lukso_mainnet");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingVerification { entry: "apiKey", .. })
        ));
    }

    #[test]
    fn test_orphan_custom_chain_fails() {
        let mut config = Config::new(None);
        let mut chain = CustomChain::for_network(Network::LuksoMainnet);
        chain.network = "lukso_devnet".to_string();
        config.etherscan.custom_chains.push(chain);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_duplicate_chain_id_fails() {
        let mut config = Config::new(None);
        config
            .networks
            .get_mut(&Network::LuksoMainnet)
            .unwrap()
            .chain_id = 4201;
        for chain in config.etherscan.custom_chains.iter_mut() {
            if chain.network == "lukso_mainnet" {
                chain.chain_id = 4201;
            }
        }
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(msg)) if msg.contains("4201")
        ));
    }

    #[test]
    fn test_duplicate_chain_id_reported_before_explorer_mismatch() {
        let mut config = Config::new(None);
        config
            .networks
            .get_mut(&Network::LuksoMainnet)
            .unwrap()
            .chain_id = 4201;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_orphan_api_key_fails() {
        let mut config = Config::new(None);
        config
            .etherscan
            .api_key
            .insert("lukso_devnet".to_string(), "empty".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(msg)) if msg.contains("apiKey entry lukso_devnet")
        ));
    }

    #[test]
    fn test_invalid_rpc_url_fails() {
        let mut config = Config::new(None);
        config.set_rpc_url(Network::LuksoMainnet, "ws://rpc.mainnet.lukso.network".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_override_file_then_env() {
        let overrides: OverrideFile = toml::from_str(
            r#"
            default_network = "lukso_mainnet"

            [network.lukso_testnet]
            url = "http://localhost:8545"

            [network.lukso_mainnet]
            url = "https://mainnet.example.org"
            "#,
        )
        .unwrap();

        let config = Config::resolve(
            Some(&overrides),
            env_of(&[("LUKSO_MAINNET_RPC_URL", "https://42.rpc.thirdweb.com")]),
        )
        .unwrap();

        assert_eq!(config.default_network, Network::LuksoMainnet);
        assert_eq!(
            config.network(Network::LuksoTestnet).unwrap().url,
            "http://localhost:8545"
        );
        assert_eq!(
            config.network(Network::LuksoMainnet).unwrap().url,
            "https://42.rpc.thirdweb.com"
        );
        assert_eq!(config.network(Network::LuksoMainnet).unwrap().chain_id, 42);
    }

    #[test]
    fn test_override_unknown_network() {
        let overrides: OverrideFile =
            toml::from_str("[network.sepolia]\nurl = \"https://rpc.sepolia.org\"\n").unwrap();
        assert!(matches!(
            Config::resolve(Some(&overrides), env_of(&[])),
            Err(ConfigError::InvalidNetwork(_))
        ));
    }

    #[test]
    fn test_network_from_env() {
        let config = Config::resolve(None, env_of(&[("LUKSO_NETWORK", "mainnet")])).unwrap();
        assert_eq!(config.default_network, Network::LuksoMainnet);
        assert!(Config::resolve(None, env_of(&[("LUKSO_NETWORK", "goerli")])).is_err());
    }

    #[test]
    fn test_json_export() {
        let key = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
        let config = Config::new(Some(key));

        let json: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(json["networks"]["lukso_testnet"]["chainId"], 4201);
        assert_eq!(json["networks"]["lukso_mainnet"]["accounts"][0], key);
        assert_eq!(json["solidity"]["settings"]["optimizer"]["runs"], 1);
        assert_eq!(json["sourcify"]["enabled"], true);
        assert!(json.get("default_network").is_none());

        let out = config.to_json().unwrap();
        let testnet = out.find("\"lukso_testnet\"").unwrap();
        let mainnet = out.find("\"lukso_mainnet\"").unwrap();
        assert!(testnet < mainnet, "testnet is exported first");

        let redacted = config.redacted().to_json().unwrap();
        assert!(!redacted.contains(key));
        assert!(redacted.contains("0x4c08…2318"));
    }

    #[test]
    fn test_toml_export() {
        let toml = Config::new(None).to_toml().unwrap();
        let value: toml::Value = toml::from_str(&toml).unwrap();
        assert_eq!(
            value["networks"]["lukso_mainnet"]["url"].as_str(),
            Some("https://rpc.mainnet.lukso.network")
        );
        assert_eq!(value["solidity"]["version"].as_str(), Some("0.8.20"));
        assert_eq!(
            value["etherscan"]["customChains"][1]["chainId"].as_integer(),
            Some(4201)
        );
    }

    #[test]
    fn test_summary_masks_accounts() {
        let key = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
        let config = Config::new(Some(key));
        let summary = config.summary(None).to_string();
        assert!(!summary.contains(key));
        assert!(summary.contains("[lukso_testnet]"));
        assert!(summary.contains("enabled (1 runs)"));

        let only_mainnet = config.summary(Some(Network::LuksoMainnet)).to_string();
        assert!(only_mainnet.contains("[lukso_mainnet]"));
        assert!(!only_mainnet.contains("[lukso_testnet]"));
    }
}
