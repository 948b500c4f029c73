use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::balance::BalanceMap;
use crate::models::transaction::Transaction;

/// Folds ledger transactions into per-asset balances.
///
/// Pure business logic — no I/O, no API calls.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Net balance of every asset seen in a transaction at or before `cutoff`.
    ///
    /// Transactions may arrive in any order; those stamped after the cutoff are
    /// skipped without touching the map, so an asset whose only activity lies in
    /// the future gets no entry at all. Balances may go negative when withdrawals
    /// exceed deposits; that is reported but not rejected. A running total that
    /// leaves the `Decimal` range fails the whole aggregation.
    pub fn aggregate(
        &self,
        transactions: &[Transaction],
        cutoff: Option<i64>,
    ) -> Result<BalanceMap, CoreError> {
        let mut balances = BalanceMap::new();
        let mut skipped = 0usize;

        for transaction in transactions {
            if !transaction.is_within(cutoff) {
                skipped += 1;
                continue;
            }
            balances.apply(transaction)?;
        }

        debug!(
            included = transactions.len() - skipped,
            skipped,
            assets = balances.len(),
            ?cutoff,
            "aggregated ledger"
        );

        for (asset, balance) in balances.iter() {
            if balance < Decimal::ZERO {
                warn!(asset, %balance, "withdrawals exceed deposits");
            }
        }

        Ok(balances)
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
