use std::fmt;

use alloy::primitives::{address, Address};
use serde::Deserialize;

/// Networks the bot can bridge between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    BaseSepolia,
    OpSepolia,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::BaseSepolia, Network::OpSepolia];

    pub fn name(&self) -> &'static str {
        match self {
            Network::BaseSepolia => "Base Sepolia",
            Network::OpSepolia => "OP Sepolia",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::BaseSepolia => 84532,
            Network::OpSepolia => 11155420,
        }
    }

    pub fn bridge_contract(&self) -> Address {
        match self {
            Network::BaseSepolia => address!("30A0155082629940d4bd9Cd41D6EF90876a0F1b5"),
            Network::OpSepolia => address!("F221750e52aA080835d2957F2Eed0d5d7dDD8C38"),
        }
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::BaseSepolia => "https://sepolia.base.org",
            Network::OpSepolia => "https://endpoints.omniatech.io/v1/op/sepolia/public",
        }
    }

    pub fn default_explorer_url(&self) -> &'static str {
        match self {
            Network::BaseSepolia => "https://sepolia.basescan.org/tx/",
            Network::OpSepolia => "https://sepolia-optimism.etherscan.io/tx/",
        }
    }

    /// The other side of the bridge.
    pub fn counterpart(&self) -> Network {
        match self {
            Network::BaseSepolia => Network::OpSepolia,
            Network::OpSepolia => Network::BaseSepolia,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved endpoint and contract data for one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub network: Network,
    pub rpc_url: String,
    pub chain_id: u64,
    pub contract: Address,
    pub explorer_url: String,
}

impl NetworkConfig {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            rpc_url: network.default_rpc_url().to_string(),
            chain_id: network.chain_id(),
            contract: network.bridge_contract(),
            explorer_url: network.default_explorer_url().to_string(),
        }
    }

    /// Explorer link for a transaction hash (`0x`-prefixed hex).
    pub fn explorer_link(&self, tx_hash: impl fmt::Display) -> String {
        format!("{}{}", self.explorer_url, tx_hash)
    }
}

/// Immutable table of every supported network, built once at startup.
#[derive(Debug, Clone)]
pub struct Networks {
    base_sepolia: NetworkConfig,
    op_sepolia: NetworkConfig,
}

impl Networks {
    pub fn new(base_sepolia: NetworkConfig, op_sepolia: NetworkConfig) -> Self {
        Self {
            base_sepolia,
            op_sepolia,
        }
    }

    pub fn get(&self, network: Network) -> &NetworkConfig {
        match network {
            Network::BaseSepolia => &self.base_sepolia,
            Network::OpSepolia => &self.op_sepolia,
        }
    }

    pub fn get_mut(&mut self, network: Network) -> &mut NetworkConfig {
        match network {
            Network::BaseSepolia => &mut self.base_sepolia,
            Network::OpSepolia => &mut self.op_sepolia,
        }
    }
}

impl Default for Networks {
    fn default() -> Self {
        Self::new(
            NetworkConfig::new(Network::BaseSepolia),
            NetworkConfig::new(Network::OpSepolia),
        )
    }
}

/// A bridging direction. Each route is only valid on its source network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    BaseToOp,
    OpToBase,
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::BaseToOp => "Base - OP Sepolia",
            Route::OpToBase => "OP - Base",
        }
    }

    pub fn source(&self) -> Network {
        match self {
            Route::BaseToOp => Network::BaseSepolia,
            Route::OpToBase => Network::OpSepolia,
        }
    }

    pub fn from_source(network: Network) -> &'static [Route] {
        match network {
            Network::BaseSepolia => &[Route::BaseToOp],
            Network::OpSepolia => &[Route::OpToBase],
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
