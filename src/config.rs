// src/config.rs

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    pub fn default_rpc_url(self) -> &'static str {
        match self {
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
            Network::Localnet => "http://127.0.0.1:9000",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "localnet" => Ok(Network::Localnet),
            other => Err(anyhow!(
                "Unknown Sui network '{}'. Expected mainnet, testnet, devnet or localnet",
                other
            )),
        }
    }
}

// Loaded once at startup and passed by reference; nothing reads the environment afterwards.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// Network selected by SUI_NETWORK
    pub network: Network,
    /// Endpoint for transaction resolution, dry-runs, history and SuiNS
    pub resolution_rpc_url: String,
    /// Endpoint for state queries and transaction execution
    pub execution_rpc_url: String,

    // Wallet settings
    pub sui_config_dir: PathBuf,

    // Transaction settings
    pub transfer_gas_budget: u64,
    pub sui_binary: String,
    pub build_timeout_secs: u64,
}

impl Config {
    /// Defaults for `network` with no environment overrides.
    pub fn for_network(network: Network) -> Self {
        Self {
            port: 8080,
            network,
            resolution_rpc_url: network.default_rpc_url().to_string(),
            execution_rpc_url: network.default_rpc_url().to_string(),
            sui_config_dir: default_sui_config_dir(),
            transfer_gas_budget: 10_000_000,
            sui_binary: "sui".to_string(),
            build_timeout_secs: 60,
        }
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        let network = match env::var("SUI_NETWORK") {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => Network::default(),
        };
        let defaults = Self::for_network(network);

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()
                .context("PORT must be a valid number")?,

            network,
            resolution_rpc_url: env::var("SUI_RPC_URL").unwrap_or(defaults.resolution_rpc_url),
            execution_rpc_url: env::var("SUI_EXECUTION_URL")
                .unwrap_or(defaults.execution_rpc_url),

            sui_config_dir: env::var("SUI_CONFIG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.sui_config_dir),

            transfer_gas_budget: env::var("SUI_TRANSFER_GAS_BUDGET")
                .unwrap_or_else(|_| defaults.transfer_gas_budget.to_string())
                .parse()
                .context("SUI_TRANSFER_GAS_BUDGET must be a valid number")?,
            sui_binary: env::var("SUI_BIN").unwrap_or(defaults.sui_binary),
            build_timeout_secs: env::var("SUI_BUILD_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.build_timeout_secs.to_string())
                .parse()
                .context("SUI_BUILD_TIMEOUT_SECS must be a valid number")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::for_network(Network::default())
    }
}

/// `~/.sui/sui_config`, where the Sui CLI keeps client.yaml and sui.keystore.
pub fn default_sui_config_dir() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".sui");
    path.push("sui_config");
    path
}
