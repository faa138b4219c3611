//! In-memory `BalanceSource` for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::FetchError;
use crate::source::BalanceSource;
use crate::types::{Mint, TokenAmount, Wallet};

#[derive(Debug, Clone)]
pub enum Native {
    Lamports(u64),
    Missing,
    Broken,
}

#[derive(Debug, Clone)]
pub enum Holdings {
    Accounts(Vec<TokenAmount>),
    MintNotFound,
    Broken,
}

pub struct MockSource {
    native: Native,
    tokens: HashMap<String, Holdings>,
    calls: AtomicUsize,
}

impl MockSource {
    pub fn new(native: Native) -> Self {
        Self {
            native,
            tokens: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_token(mut self, mint: &str, holdings: Holdings) -> Self {
        self.tokens.insert(mint.to_string(), holdings);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceSource for MockSource {
    async fn native_balance(&self, _wallet: &Wallet) -> Result<Option<u64>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.native {
            Native::Lamports(lamports) => Ok(Some(lamports)),
            Native::Missing => Ok(None),
            Native::Broken => Err(FetchError::Transport("connection reset".to_string())),
        }
    }

    async fn token_accounts(
        &self,
        _wallet: &Wallet,
        mint: &Mint,
    ) -> Result<Vec<TokenAmount>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.tokens.get(mint.as_str()) {
            Some(Holdings::Accounts(accounts)) => Ok(accounts.clone()),
            Some(Holdings::MintNotFound) => Err(FetchError::MintNotFound(mint.to_string())),
            Some(Holdings::Broken) => Err(FetchError::Transport("request timed out".to_string())),
            None => Ok(Vec::new()),
        }
    }
}
