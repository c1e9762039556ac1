//! LUKSO Tools Library
//!
//! Provides the network, compiler and verification configuration used to
//! deploy contracts to the LUKSO test and main networks.

pub mod config;
pub mod explorer;
pub mod network;
pub mod solidity;

pub use config::{Config, ConfigError};
pub use network::{Account, Network, NetworkConfig};
