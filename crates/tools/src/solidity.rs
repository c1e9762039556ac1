//! Solidity compiler settings.

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Pinned compiler release
pub const SOLC_VERSION: &str = "0.8.20";

/// Optimize for deployed size, not gas efficiency
pub const OPTIMIZER_RUNS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerSettings {
    pub enabled: bool,
    pub runs: u32,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        OptimizerSettings {
            enabled: true,
            runs: OPTIMIZER_RUNS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompilerSettings {
    pub optimizer: OptimizerSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidityConfig {
    pub version: String,
    pub settings: CompilerSettings,
}

impl Default for SolidityConfig {
    fn default() -> Self {
        SolidityConfig {
            version: SOLC_VERSION.to_string(),
            settings: CompilerSettings::default(),
        }
    }
}

impl SolidityConfig {
    /// Parsed compiler version. Partial versions like `0.8` are rejected.
    pub fn compiler_version(&self) -> Result<Version, ConfigError> {
        Version::parse(&self.version).map_err(|e| ConfigError::InvalidCompilerVersion {
            version: self.version.clone(),
            reason: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.compiler_version()?;

        let optimizer = &self.settings.optimizer;
        if optimizer.enabled && optimizer.runs == 0 {
            return Err(ConfigError::ValidationError(
                "optimizer runs must be at least 1 when the optimizer is enabled".to_string(),
            ));
        }

        Ok(())
    }
}
