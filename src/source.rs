use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::{Mint, TokenAmount, Wallet};

/// Read-only view of an RPC endpoint - implement this for each transport
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Smallest-unit native balance, or `None` if the account does not exist on chain
    async fn native_balance(&self, wallet: &Wallet) -> Result<Option<u64>, FetchError>;

    /// Every token account owned by `wallet` for `mint`
    ///
    /// Returns `FetchError::MintNotFound` when the mint itself is absent from the network.
    async fn token_accounts(
        &self,
        wallet: &Wallet,
        mint: &Mint,
    ) -> Result<Vec<TokenAmount>, FetchError>;
}
