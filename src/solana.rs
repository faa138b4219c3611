use async_trait::async_trait;
use base64::Engine;
use log::debug;
use solana_account_decoder::{UiAccountData, UiAccountEncoding};
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::{RpcError, TokenAccountsFilter};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::time::Duration;

use crate::config::Config;
use crate::error::FetchError;
use crate::source::BalanceSource;
use crate::types::{Mint, TokenAmount, Wallet};

/// JSON-RPC "invalid params" error code
const JSON_RPC_INVALID_PARAMS: i64 = -32602;

/// Messages the RPC node uses when the filter mint is absent from the cluster
const MISSING_MINT_MARKERS: [&str; 2] = ["could not find mint", "could not be unpacked"];

/// Solana balance source using JSON-RPC
pub struct SolanaSource {
    client: RpcClient,
}

impl SolanaSource {
    pub fn new(rpc_url: String, timeout: Duration, commitment: CommitmentConfig) -> Self {
        Self {
            client: RpcClient::new_with_timeout_and_commitment(rpc_url, timeout, commitment),
        }
    }

    pub fn from_config(config: &Config, rpc_url: String) -> anyhow::Result<Self> {
        Ok(Self::new(rpc_url, config.timeout(), config.commitment()?))
    }

    pub fn url(&self) -> String {
        self.client.url()
    }

    async fn mint_decimals(&self, mint: &Pubkey) -> Result<u8, FetchError> {
        let account = self
            .client
            .get_account(mint)
            .await
            .map_err(|e| classify(e, mint))?;
        let data = account.data.get(..spl_token::state::Mint::LEN).ok_or_else(|| {
            FetchError::MalformedAccount {
                account: mint.to_string(),
                reason: format!("mint data is only {} bytes", account.data.len()),
            }
        })?;
        let state = spl_token::state::Mint::unpack(data).map_err(|e| FetchError::MalformedAccount {
            account: mint.to_string(),
            reason: e.to_string(),
        })?;
        Ok(state.decimals)
    }
}

#[async_trait]
impl BalanceSource for SolanaSource {
    async fn native_balance(&self, wallet: &Wallet) -> Result<Option<u64>, FetchError> {
        let response = self
            .client
            .get_account_with_commitment(wallet.pubkey(), self.client.commitment())
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(response.value.map(|account| account.lamports))
    }

    async fn token_accounts(
        &self,
        wallet: &Wallet,
        mint: &Mint,
    ) -> Result<Vec<TokenAmount>, FetchError> {
        let mint_pubkey =
            Pubkey::from_str(mint.as_str()).map_err(|e| FetchError::InvalidAddress {
                address: mint.to_string(),
                reason: e.to_string(),
            })?;

        let token_accounts = self
            .client
            .get_token_accounts_by_owner(wallet.pubkey(), TokenAccountsFilter::Mint(mint_pubkey))
            .await
            .map_err(|e| classify(e, &mint_pubkey))?;
        debug!(
            "{} holds {} account(s) of mint {}",
            wallet,
            token_accounts.len(),
            mint
        );

        let mut amounts = Vec::with_capacity(token_accounts.len());
        let mut mint_decimals = None;
        for keyed in &token_accounts {
            let amount = match decode_token_account(&keyed.pubkey, &keyed.account.data)? {
                Holding::Parsed(amount) => amount,
                Holding::Packed(raw) => {
                    // Binary layouts carry no decimals; read them from the mint once.
                    let decimals = match mint_decimals {
                        Some(decimals) => decimals,
                        None => {
                            let decimals = self.mint_decimals(&mint_pubkey).await?;
                            mint_decimals = Some(decimals);
                            decimals
                        }
                    };
                    TokenAmount::new(raw, decimals)
                }
            };
            amounts.push(amount);
        }

        Ok(amounts)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Holding {
    Parsed(TokenAmount),
    /// Raw amount whose decimals live on the mint account
    Packed(u64),
}

fn decode_token_account(account: &str, data: &UiAccountData) -> Result<Holding, FetchError> {
    let malformed = |reason: String| FetchError::MalformedAccount {
        account: account.to_string(),
        reason,
    };

    match data {
        UiAccountData::Json(parsed) => {
            let token_amount = parsed
                .parsed
                .get("info")
                .and_then(|info| info.get("tokenAmount"))
                .ok_or_else(|| malformed("missing info.tokenAmount".to_string()))?;
            let amount = token_amount
                .get("amount")
                .and_then(|amount| amount.as_str())
                .ok_or_else(|| malformed("missing tokenAmount.amount".to_string()))?
                .parse::<u64>()
                .map_err(|e| malformed(format!("bad tokenAmount.amount: {}", e)))?;
            let decimals = token_amount
                .get("decimals")
                .and_then(|decimals| decimals.as_u64())
                .and_then(|decimals| u8::try_from(decimals).ok())
                .ok_or_else(|| malformed("missing tokenAmount.decimals".to_string()))?;
            Ok(Holding::Parsed(TokenAmount::new(amount, decimals)))
        }
        UiAccountData::Binary(encoded, UiAccountEncoding::Base64)
        | UiAccountData::LegacyBinary(encoded) => {
            let engine = base64::engine::general_purpose::STANDARD;
            let decoded = engine
                .decode(encoded)
                .map_err(|e| malformed(format!("bad base64: {}", e)))?;
            // Token-2022 accounts append extensions after the base layout.
            let base = decoded
                .get(..spl_token::state::Account::LEN)
                .ok_or_else(|| malformed(format!("account data is only {} bytes", decoded.len())))?;
            let state = spl_token::state::Account::unpack(base)
                .map_err(|e| malformed(e.to_string()))?;
            Ok(Holding::Packed(state.amount))
        }
        UiAccountData::Binary(_, encoding) => {
            Err(malformed(format!("unsupported encoding {:?}", encoding)))
        }
    }
}

fn classify(err: ClientError, mint: &Pubkey) -> FetchError {
    if is_missing_mint(err.kind()) {
        FetchError::MintNotFound(mint.to_string())
    } else {
        FetchError::Transport(err.to_string())
    }
}

fn is_missing_mint(kind: &ClientErrorKind) -> bool {
    match kind {
        ClientErrorKind::RpcError(RpcError::RpcResponseError { code, message, .. }) => {
            *code == JSON_RPC_INVALID_PARAMS
                && MISSING_MINT_MARKERS
                    .iter()
                    .any(|marker| message.contains(marker))
        }
        _ => false,
    }
}
