use std::{
    collections::HashMap,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use alloy::primitives::{
    utils::{parse_units, ParseUnits},
    Bytes,
};
use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    chain::{Network, Networks, Route},
    submitter::GasPriceStrategy,
    wallet::{Wallet, Wallets},
};

/// Gas price used when the operator leaves the prompt blank.
pub const DEFAULT_GAS_PRICE_GWEI: &str = "1";

#[derive(Parser, Debug)]
#[command(name = "bridge-bot")]
#[command(about = "Repeatedly bridges between Base Sepolia and OP Sepolia")]
pub struct Args {
    /// TOML file with wallets, route payloads and network overrides
    #[arg(short, long, default_value = "bridge.toml")]
    pub config: PathBuf,

    /// Fixed gas price in gwei (skips the interactive prompt)
    #[arg(long, conflicts_with = "live_gas")]
    pub gas_price_gwei: Option<String>,

    /// Query the gas price from the node before every submission
    #[arg(long)]
    pub live_gas: bool,

    /// Stop after this many loop iterations instead of running forever
    #[arg(long)]
    pub iterations: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("no wallets configured")]
    NoWallets,
    #[error("wallet #{index} has an invalid private key: {reason}")]
    InvalidKey { index: usize, reason: String },
    #[error("route {route} has invalid calldata: {reason}")]
    InvalidCalldata { route: Route, reason: String },
    #[error("network {network} has an invalid rpc url: {reason}")]
    InvalidRpcUrl { network: Network, reason: String },
    #[error("invalid gas price {input:?}: {reason}")]
    InvalidGasPrice { input: String, reason: String },
    #[error("cannot read gas price from stdin: {0}")]
    Prompt(std::io::Error),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WalletEntry {
    private_key: String,
    label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NetworkOverride {
    rpc_url: Option<String>,
    explorer_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RouteEntries {
    base_to_op: Option<String>,
    op_to_base: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NetworkOverrides {
    base_sepolia: Option<NetworkOverride>,
    op_sepolia: Option<NetworkOverride>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    start_network: Option<Network>,
    #[serde(default)]
    wallets: Vec<WalletEntry>,
    #[serde(default)]
    routes: RouteEntries,
    #[serde(default)]
    networks: NetworkOverrides,
}

/// Calldata payloads keyed by route.
#[derive(Debug, Clone, Default)]
pub struct RouteTable(HashMap<Route, Bytes>);

impl RouteTable {
    pub fn new(payloads: HashMap<Route, Bytes>) -> Self {
        Self(payloads)
    }

    pub fn get(&self, route: Route) -> Option<&Bytes> {
        self.0.get(&route)
    }
}

/// Everything the bot needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub networks: Networks,
    pub wallets: Wallets,
    pub routes: RouteTable,
    pub start_network: Network,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(raw)?;

        let wallets = file
            .wallets
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let label = entry
                    .label
                    .clone()
                    .unwrap_or_else(|| format!("Wallet {}", index + 1));
                Wallet::from_key(&entry.private_key, label).map_err(|e| ConfigError::InvalidKey {
                    index: index + 1,
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let wallets = Wallets::new(wallets).ok_or(ConfigError::NoWallets)?;

        let routes = [
            (Route::BaseToOp, file.routes.base_to_op),
            (Route::OpToBase, file.routes.op_to_base),
        ]
        .into_iter()
        .filter_map(|(route, hex)| hex.map(|hex| (route, hex)))
        .map(|(route, hex)| {
            let payload = hex
                .trim()
                .parse::<Bytes>()
                .map_err(|e| ConfigError::InvalidCalldata {
                    route,
                    reason: e.to_string(),
                })?;
            Ok((route, payload))
        })
        .collect::<Result<HashMap<_, _>, ConfigError>>()?;

        let mut networks = Networks::default();
        let overrides = [
            (Network::BaseSepolia, file.networks.base_sepolia),
            (Network::OpSepolia, file.networks.op_sepolia),
        ];
        for (network, overrides) in overrides {
            let Some(overrides) = overrides else {
                continue;
            };
            let config = networks.get_mut(network);
            if let Some(rpc_url) = overrides.rpc_url {
                config.rpc_url = rpc_url;
            }
            if let Some(explorer_url) = overrides.explorer_url {
                config.explorer_url = explorer_url;
            }
        }
        for network in Network::ALL {
            let rpc_url = &networks.get(network).rpc_url;
            rpc_url
                .parse::<alloy::transports::http::reqwest::Url>()
                .map_err(|e| ConfigError::InvalidRpcUrl {
                    network,
                    reason: e.to_string(),
                })?;
        }

        Ok(Self {
            networks,
            wallets,
            routes: RouteTable::new(routes),
            start_network: file.start_network.unwrap_or(Network::BaseSepolia),
        })
    }
}

/// Converts a gwei amount such as `"1.5"` to wei.
pub fn parse_gwei(input: &str) -> Result<u128, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidGasPrice {
        input: input.to_string(),
        reason,
    };
    let wei = match parse_units(input.trim(), "gwei").map_err(|e| invalid(e.to_string()))? {
        ParseUnits::U256(wei) => wei,
        ParseUnits::I256(_) => return Err(invalid("gas price must be positive".to_string())),
    };
    if wei.is_zero() {
        return Err(invalid("gas price must be positive".to_string()));
    }
    wei.try_into().map_err(|_| invalid("gas price too large".to_string()))
}

/// Reads a gwei amount from `input`; a blank line selects the default.
pub fn prompt_gas_price<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> Result<u128, ConfigError> {
    write!(
        output,
        "Gas price in gwei (blank for {DEFAULT_GAS_PRICE_GWEI}): "
    )
    .and_then(|_| output.flush())
    .map_err(ConfigError::Prompt)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(ConfigError::Prompt)?;
    let line = line.trim();

    parse_gwei(if line.is_empty() {
        DEFAULT_GAS_PRICE_GWEI
    } else {
        line
    })
}

/// Chooses the gas price strategy from the flags, prompting when neither is set.
pub fn gas_price_strategy<R: BufRead, W: Write>(
    args: &Args,
    input: R,
    output: W,
) -> Result<GasPriceStrategy, ConfigError> {
    if args.live_gas {
        return Ok(GasPriceStrategy::Live);
    }
    let wei = match &args.gas_price_gwei {
        Some(gwei) => parse_gwei(gwei)?,
        None => prompt_gas_price(input, output)?,
    };
    Ok(GasPriceStrategy::Fixed(wei))
}
