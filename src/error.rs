use thiserror::Error;

/// How a failed lookup should be treated by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The mint does not exist on the queried network; the balance is zero
    ExpectedEmpty,
    /// Anything else; logged, then reported as zero
    Unexpected,
}

/// Failure of a single balance lookup
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("mint {0} does not exist on this network")]
    MintNotFound(String),

    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("rpc request failed: {0}")]
    Transport(String),

    #[error("malformed token account {account}: {reason}")]
    MalformedAccount { account: String, reason: String },

    #[error("amount {amount} with {decimals} decimals cannot be represented")]
    Precision { amount: u64, decimals: u8 },
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::MintNotFound(_) => FailureKind::ExpectedEmpty,
            _ => FailureKind::Unexpected,
        }
    }

    pub fn is_expected_empty(&self) -> bool {
        self.kind() == FailureKind::ExpectedEmpty
    }
}

/// Errors that abort a whole query
#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("invalid wallet address '{address}': {reason}")]
    InvalidWallet { address: String, reason: String },
}
