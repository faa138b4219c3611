use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use solana_sdk::pubkey::Pubkey;

use crate::error::{BalanceError, FetchError};

/// The owner whose balances are queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wallet(Pubkey);

impl Wallet {
    pub fn pubkey(&self) -> &Pubkey {
        &self.0
    }
}

impl FromStr for Wallet {
    type Err = BalanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pubkey::from_str(s.trim())
            .map(Wallet)
            .map_err(|e| BalanceError::InvalidWallet {
                address: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl From<Pubkey> for Wallet {
    fn from(pubkey: Pubkey) -> Self {
        Self(pubkey)
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A fungible token type, identified by its mint address
///
/// Kept as the caller supplied it; it is only parsed when a lookup is made, so a
/// malformed mint fails its own entry and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mint(String);

impl Mint {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Mint {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Mint {
    fn from(address: String) -> Self {
        Self(address)
    }
}

impl fmt::Display for Mint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw holding of one token account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    pub amount: u64,
    pub decimals: u8,
}

impl TokenAmount {
    pub fn new(amount: u64, decimals: u8) -> Self {
        Self { amount, decimals }
    }

    pub fn to_decimal(self) -> Result<Decimal, FetchError> {
        normalize(self.amount, self.decimals)
    }
}

/// Convert a smallest-unit integer into a decimal quantity (`amount / 10^decimals`)
pub fn normalize(amount: u64, decimals: u8) -> Result<Decimal, FetchError> {
    Decimal::try_from_i128_with_scale(i128::from(amount), u32::from(decimals))
        .map_err(|_| FetchError::Precision { amount, decimals })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceEntry {
    pub key: String,
    pub amount: Decimal,
}

/// Balances of one query: native first, then mints in request order
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSet {
    entries: Vec<BalanceEntry>,
}

impl BalanceSet {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends an entry; returns false and leaves the set unchanged if `key` is present
    pub(crate) fn insert(&mut self, key: impl Into<String>, amount: Decimal) -> bool {
        let key = key.into();
        if self.contains(&key) {
            return false;
        }
        self.entries.push(BalanceEntry { key, amount });
        true
    }

    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.amount)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BalanceEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a BalanceSet {
    type Item = &'a BalanceEntry;
    type IntoIter = std::slice::Iter<'a, BalanceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for BalanceSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key, &entry.amount)?;
        }
        map.end()
    }
}
