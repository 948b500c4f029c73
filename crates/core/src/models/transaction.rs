use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// Direction of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Funds moved into the portfolio
    #[serde(rename = "DEPOSIT")]
    Deposit,
    /// Funds moved out of the portfolio
    #[serde(rename = "WITHDRAWAL")]
    Withdrawal,
}

impl TransactionType {
    pub const DEPOSIT_MARKER: &'static str = "DEPOSIT";
    pub const WITHDRAWAL_MARKER: &'static str = "WITHDRAWAL";
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Deposit => write!(f, "{}", Self::DEPOSIT_MARKER),
            TransactionType::Withdrawal => write!(f, "{}", Self::WITHDRAWAL_MARKER),
        }
    }
}

/// Markers are matched exactly; `deposit` or ` DEPOSIT` are rejected.
impl FromStr for TransactionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::DEPOSIT_MARKER => Ok(TransactionType::Deposit),
            Self::WITHDRAWAL_MARKER => Ok(TransactionType::Withdrawal),
            other => Err(CoreError::UnknownTransactionType {
                line: None,
                value: other.to_string(),
            }),
        }
    }
}

/// A single deposit or withdrawal recorded in the ledger.
///
/// Transactions are immutable once ingested. The `asset` symbol is kept
/// exactly as recorded: "btc" and "BTC" are distinct ledger lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Recording time, seconds since the Unix epoch
    pub timestamp: i64,

    /// Deposit or Withdrawal
    pub kind: TransactionType,

    /// Asset symbol (e.g., "BTC", "USD")
    pub asset: String,

    /// Quantity moved (never negative)
    pub amount: Decimal,
}

impl Transaction {
    pub fn new(
        timestamp: i64,
        kind: TransactionType,
        asset: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            timestamp,
            kind,
            asset: asset.into(),
            amount,
        }
    }

    pub fn deposit(timestamp: i64, asset: impl Into<String>, amount: Decimal) -> Self {
        Self::new(timestamp, TransactionType::Deposit, asset, amount)
    }

    pub fn withdrawal(timestamp: i64, asset: impl Into<String>, amount: Decimal) -> Self {
        Self::new(timestamp, TransactionType::Withdrawal, asset, amount)
    }

    /// The amount with the sign this transaction applies to its asset's balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Deposit => self.amount,
            TransactionType::Withdrawal => -self.amount,
        }
    }

    /// Whether this transaction falls inside an inclusive cutoff.
    /// No cutoff means every transaction is included.
    pub fn is_within(&self, cutoff: Option<i64>) -> bool {
        cutoff.is_none_or(|cutoff| self.timestamp <= cutoff)
    }
}
