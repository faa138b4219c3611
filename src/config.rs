use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::types::Mint;

const MAX_DECIMALS: u8 = 28;

/// Networks, tokens and client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(rename = "defaultNetwork")]
    pub default_network: String,
    pub networks: HashMap<String, NetworkConfig>,
    #[serde(rename = "nativeToken")]
    pub native_token: NativeToken,
    /// Tokens queried when the caller names none, in output order
    pub tokens: Vec<TokenInfo>,
    #[serde(default = "default_commitment")]
    pub commitment: String,
    #[serde(rename = "timeoutSecs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// A cluster reachable over JSON-RPC
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    pub name: String,
    pub rpc: String,
}

/// The chain's base currency
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct NativeToken {
    pub symbol: String,
    pub decimals: u8,
}

/// A well-known SPL token
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub address: String,
    pub decimals: u8,
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from embedded JSON
    pub fn load() -> Result<Self> {
        let config_str = include_str!("../config.json");
        Self::parse(config_str)
    }

    /// Load configuration from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&config_str).with_context(|| format!("invalid config file {}", path.display()))
    }

    fn parse(config_str: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.native_token.decimals > MAX_DECIMALS {
            bail!(
                "native token decimals {} exceed the supported maximum of {}",
                self.native_token.decimals,
                MAX_DECIMALS
            );
        }
        if !self.networks.contains_key(&self.default_network) {
            bail!(
                "default network '{}' is not defined in networks",
                self.default_network
            );
        }

        let mut symbols = HashSet::new();
        let mut addresses = HashSet::new();
        for token in &self.tokens {
            if !symbols.insert(token.symbol.as_str()) {
                bail!("token symbol '{}' is listed twice", token.symbol);
            }
            if !addresses.insert(token.address.as_str()) {
                bail!("token address '{}' is listed twice", token.address);
            }
        }

        self.commitment()?;
        Ok(())
    }

    /// Get a specific network configuration
    pub fn network(&self, name: &str) -> Option<&NetworkConfig> {
        self.networks.get(name)
    }

    pub fn default_mints(&self) -> Vec<Mint> {
        self.tokens
            .iter()
            .map(|token| Mint::new(token.address.clone()))
            .collect()
    }

    /// Symbol of a well-known mint
    pub fn label_for(&self, mint: &str) -> Option<&str> {
        self.tokens
            .iter()
            .find(|token| token.address == mint)
            .map(|token| token.symbol.as_str())
    }

    pub fn commitment(&self) -> Result<CommitmentConfig> {
        CommitmentConfig::from_str(&self.commitment)
            .map_err(|_| anyhow!("unknown commitment level '{}'", self.commitment))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
