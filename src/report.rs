use anyhow::Result;

use crate::config::Config;
use crate::types::BalanceSet;

/// Relabel well-known mints with their symbols and round every amount to `decimals` places
///
/// A mint keeps its address when its symbol is already taken by an earlier entry.
pub fn present(balances: &BalanceSet, config: &Config, decimals: u32) -> BalanceSet {
    let mut presented = BalanceSet::with_capacity(balances.len());
    for entry in balances {
        let amount = entry.amount.round_dp(decimals);
        let label = config.label_for(&entry.key).unwrap_or(&entry.key);
        if !presented.insert(label, amount) {
            presented.insert(entry.key.as_str(), amount);
        }
    }
    presented
}

/// Human readable table
pub fn render_text(balances: &BalanceSet, wallet: &str, endpoint: &str, decimals: u32) -> String {
    let rule = "=".repeat(60);
    let width = balances
        .keys()
        .map(str::len)
        .max()
        .unwrap_or(0)
        .max(6);

    let mut out = format!("Wallet:   {}\nEndpoint: {}\n{}\n", wallet, endpoint, rule);
    for entry in balances {
        out.push_str(&format!(
            "{:width$} | {:>20.prec$}\n",
            entry.key,
            entry.amount,
            width = width,
            prec = decimals as usize
        ));
    }
    out.push_str(&rule);
    out
}

pub fn render_json(balances: &BalanceSet) -> Result<String> {
    Ok(serde_json::to_string_pretty(balances)?)
}
