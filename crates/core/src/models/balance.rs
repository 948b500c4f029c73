use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::transaction::Transaction;
use crate::errors::CoreError;

/// Signed net holdings per asset, built fresh for every valuation.
///
/// Backed by a `BTreeMap` so iteration is always sorted by asset symbol,
/// which keeps rate lookups in a reproducible order. Assets that never
/// appeared in an included transaction have no entry and read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BalanceMap {
    balances: BTreeMap<String, Decimal>,
}

impl BalanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one transaction into its asset's running total.
    /// The map is left unchanged when the new total would overflow.
    pub fn apply(&mut self, transaction: &Transaction) -> Result<(), CoreError> {
        let balance = self
            .balances
            .entry(transaction.asset.clone())
            .or_insert(Decimal::ZERO);
        *balance = balance
            .checked_add(transaction.signed_amount())
            .ok_or_else(|| CoreError::Overflow(format!("{} balance", transaction.asset)))?;
        Ok(())
    }

    /// Balance for `asset`, zero when the asset was never seen.
    pub fn get(&self, asset: &str) -> Decimal {
        self.balances.get(asset).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, asset: &str) -> bool {
        self.balances.contains_key(asset)
    }

    /// `(asset, balance)` pairs in ascending asset order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.balances.iter().map(|(asset, balance)| (asset.as_str(), *balance))
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}
