use std::collections::HashSet;

use futures::future::join_all;
use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::config::NativeToken;
use crate::error::FetchError;
use crate::fetcher::{fetch_native, fetch_token};
use crate::source::BalanceSource;
use crate::types::{BalanceSet, Mint, Wallet};

/// Native balance plus one entry per distinct requested mint
///
/// All lookups run concurrently. A lookup that fails is logged and reported as zero;
/// it never affects the other entries.
pub async fn aggregate<S>(
    source: &S,
    wallet: &Wallet,
    mints: &[Mint],
    native: &NativeToken,
) -> BalanceSet
where
    S: BalanceSource + ?Sized,
{
    let mints = distinct(mints, &native.symbol);
    info!(
        "querying {} balance and {} token(s) for {}",
        native.symbol,
        mints.len(),
        wallet
    );

    let (native_result, token_results) = futures::join!(
        fetch_native(source, wallet, native.decimals),
        join_all(mints.iter().map(|mint| fetch_token(source, wallet, mint)))
    );

    let mut balances = BalanceSet::with_capacity(1 + mints.len());
    balances.insert(
        native.symbol.clone(),
        settle(native_result, || format!("native {} lookup", native.symbol)),
    );
    for (mint, result) in mints.iter().zip(token_results) {
        let amount = settle(result, || format!("mint {} lookup", mint));
        if !balances.insert(mint.as_str(), amount) {
            warn!("mint {} collides with an existing entry, its balance is not reported", mint);
        }
    }

    balances
}

fn settle(result: Result<Decimal, FetchError>, context: impl FnOnce() -> String) -> Decimal {
    match result {
        Ok(amount) => amount,
        Err(e) if e.is_expected_empty() => Decimal::ZERO,
        Err(e) => {
            warn!("{} failed, reporting 0: {}", context(), e);
            Decimal::ZERO
        }
    }
}

/// Requested mints without repeats, in request order
///
/// A mint spelled like the native symbol would share the native entry's key, so it is
/// excluded with a warning.
fn distinct<'a>(mints: &'a [Mint], native_symbol: &str) -> Vec<&'a Mint> {
    let mut seen = HashSet::new();
    mints
        .iter()
        .filter(|mint| {
            if mint.as_str() == native_symbol {
                warn!(
                    "ignoring mint '{}': it is the native symbol, not a mint address",
                    mint
                );
                return false;
            }
            let first = seen.insert(mint.as_str());
            if !first {
                debug!("ignoring repeated mint {}", mint);
            }
            first
        })
        .collect()
}
