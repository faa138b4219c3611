mod aggregator;
mod config;
mod error;
mod fetcher;
mod report;
mod solana;
mod source;
#[cfg(test)]
mod testing;
mod types;

pub use aggregator::aggregate;
pub use config::{Config, NativeToken, NetworkConfig, TokenInfo};
pub use error::{BalanceError, FailureKind, FetchError};
pub use fetcher::{fetch_native, fetch_token};
pub use report::{present, render_json, render_text};
pub use solana::SolanaSource;
pub use source::BalanceSource;
pub use types::{normalize, BalanceEntry, BalanceSet, Mint, TokenAmount, Wallet};

use anyhow::{anyhow, Result};

/// Get balances for a wallet from any balance source
///
/// Only a malformed wallet address fails the query; every other failure becomes a zero entry.
pub async fn get_balances<S>(
    source: &S,
    address: &str,
    mints: &[Mint],
    native: &NativeToken,
) -> std::result::Result<BalanceSet, BalanceError>
where
    S: BalanceSource + ?Sized,
{
    let wallet: Wallet = address.parse()?;
    Ok(aggregate(source, &wallet, mints, native).await)
}

/// Get native and default token balances for an address on a configured network
pub async fn get_network_balances(network: &str, address: &str) -> Result<BalanceSet> {
    let config = Config::load()?;
    let network_config = config
        .network(network)
        .ok_or_else(|| anyhow!("Network '{}' not found in configuration", network))?;

    let source = SolanaSource::from_config(&config, network_config.rpc.clone())?;
    let balances = get_balances(
        &source,
        address,
        &config.default_mints(),
        &config.native_token,
    )
    .await?;
    Ok(balances)
}
