use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use crate::errors::CoreError;
use crate::models::transaction::{Transaction, TransactionType};

/// One CSV row exactly as written, before any coercion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawTransactionRow {
    pub timestamp: String,
    pub transaction_type: String,
    pub token: String,
    pub amount: String,
}

impl RawTransactionRow {
    /// Convert to a typed `Transaction`, naming the failing field on error.
    ///
    /// `line` is only used to annotate errors.
    pub fn parse(self, line: Option<u64>) -> Result<Transaction, CoreError> {
        let timestamp = parse_timestamp(&self.timestamp, line)?;

        let kind = TransactionType::from_str(&self.transaction_type).map_err(|_| {
            CoreError::UnknownTransactionType {
                line,
                value: self.transaction_type.clone(),
            }
        })?;

        if self.token.is_empty() {
            return Err(CoreError::ValidationError(format!(
                "empty token{}",
                line.map(|l| format!(" at line {l}")).unwrap_or_default()
            )));
        }

        let amount = parse_amount(&self.amount, line)?;
        if amount < Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "amount must not be negative, got {amount}{}",
                line.map(|l| format!(" at line {l}")).unwrap_or_default()
            )));
        }

        Ok(Transaction {
            timestamp,
            kind,
            asset: self.token,
            amount,
        })
    }
}

fn parse_timestamp(raw: &str, line: Option<u64>) -> Result<i64, CoreError> {
    raw.trim().parse().map_err(|_| CoreError::InvalidNumber {
        line,
        field: "timestamp",
        value: raw.to_string(),
    })
}

/// Accepts plain decimals ("0.5") and scientific notation ("5e-1").
fn parse_amount(raw: &str, line: Option<u64>) -> Result<Decimal, CoreError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| CoreError::InvalidNumber {
            line,
            field: "amount",
            value: raw.to_string(),
        })
}
