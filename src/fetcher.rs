use log::debug;
use rust_decimal::Decimal;

use crate::error::FetchError;
use crate::source::BalanceSource;
use crate::types::{normalize, Mint, Wallet};

/// Native balance of `wallet` as a decimal quantity
///
/// An account that does not exist yet holds nothing, so it reads as zero.
pub async fn fetch_native<S>(
    source: &S,
    wallet: &Wallet,
    native_decimals: u8,
) -> Result<Decimal, FetchError>
where
    S: BalanceSource + ?Sized,
{
    match source.native_balance(wallet).await? {
        Some(lamports) => normalize(lamports, native_decimals),
        None => {
            debug!("account {} not found, native balance is 0", wallet);
            Ok(Decimal::ZERO)
        }
    }
}

/// Sum of every `mint` account owned by `wallet`
///
/// A mint that does not exist on the queried network is not an error: it yields zero.
pub async fn fetch_token<S>(
    source: &S,
    wallet: &Wallet,
    mint: &Mint,
) -> Result<Decimal, FetchError>
where
    S: BalanceSource + ?Sized,
{
    let accounts = match source.token_accounts(wallet, mint).await {
        Ok(accounts) => accounts,
        Err(e) if e.is_expected_empty() => {
            debug!("{}, balance is 0", e);
            return Ok(Decimal::ZERO);
        }
        Err(e) => return Err(e),
    };

    let mut total = Decimal::ZERO;
    for account in accounts {
        let amount = account.to_decimal()?;
        total = total
            .checked_add(amount)
            .ok_or(FetchError::Precision {
                amount: account.amount,
                decimals: account.decimals,
            })?;
    }

    debug!("mint {} total for {}: {}", mint, wallet, total);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Holdings, MockSource, Native};
    use crate::types::TokenAmount;
    use solana_sdk::pubkey::Pubkey;

    const MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn wallet() -> Wallet {
        Wallet::from(Pubkey::new_unique())
    }

    #[test]
    fn test_native_is_scaled_by_divisor() {
        let source = MockSource::new(Native::Lamports(511_430_647_004));
        let sol = tokio_test::block_on(fetch_native(&source, &wallet(), 9)).unwrap();
        assert_eq!(sol, Decimal::new(511_430_647_004, 9));
    }

    #[test]
    fn test_missing_account_has_zero_native_balance() {
        let source = MockSource::new(Native::Missing);
        let sol = tokio_test::block_on(fetch_native(&source, &wallet(), 9)).unwrap();
        assert_eq!(sol, Decimal::ZERO);
    }

    #[test]
    fn test_native_transport_failure_is_unexpected() {
        let source = MockSource::new(Native::Broken);
        let err = tokio_test::block_on(fetch_native(&source, &wallet(), 9)).unwrap_err();
        assert!(!err.is_expected_empty());
    }

    #[test]
    fn test_single_account() {
        let source = MockSource::new(Native::Missing).with_token(
            MINT,
            Holdings::Accounts(vec![TokenAmount::new(1_000_000, 6)]),
        );
        let usdc =
            tokio_test::block_on(fetch_token(&source, &wallet(), &Mint::from(MINT))).unwrap();
        assert_eq!(usdc, Decimal::ONE);
    }

    #[test]
    fn test_accounts_of_same_mint_are_summed() {
        let source = MockSource::new(Native::Missing).with_token(
            MINT,
            Holdings::Accounts(vec![
                TokenAmount::new(1_500_000, 6),
                TokenAmount::new(2_250_000, 6),
            ]),
        );
        let usdc =
            tokio_test::block_on(fetch_token(&source, &wallet(), &Mint::from(MINT))).unwrap();
        assert_eq!(usdc, Decimal::new(375, 2));
    }

    #[test]
    fn test_no_accounts_is_zero() {
        let source = MockSource::new(Native::Missing);
        let usdc =
            tokio_test::block_on(fetch_token(&source, &wallet(), &Mint::from(MINT))).unwrap();
        assert_eq!(usdc, Decimal::ZERO);
    }

    #[test]
    fn test_missing_mint_is_zero_not_error() {
        let source = MockSource::new(Native::Missing).with_token(MINT, Holdings::MintNotFound);
        let usdc =
            tokio_test::block_on(fetch_token(&source, &wallet(), &Mint::from(MINT))).unwrap();
        assert_eq!(usdc, Decimal::ZERO);
    }

    #[test]
    fn test_transport_failure_propagates() {
        let source = MockSource::new(Native::Missing).with_token(MINT, Holdings::Broken);
        let err =
            tokio_test::block_on(fetch_token(&source, &wallet(), &Mint::from(MINT))).unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[test]
    fn test_unrepresentable_decimals_fail() {
        let source = MockSource::new(Native::Missing).with_token(
            MINT,
            Holdings::Accounts(vec![TokenAmount::new(1, 200)]),
        );
        let err =
            tokio_test::block_on(fetch_token(&source, &wallet(), &Mint::from(MINT))).unwrap_err();
        assert!(matches!(err, FetchError::Precision { decimals: 200, .. }));
    }
}
