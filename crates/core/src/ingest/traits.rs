use crate::errors::CoreError;
use crate::models::transaction::Transaction;

/// Supplies the ledger's transactions in arrival order.
///
/// Each valuation calls `load` exactly once and owns the result, so an
/// implementation only needs to be replayable, not restartable mid-stream.
/// Order is not required to be chronological.
pub trait TransactionSource: Send + Sync {
    /// Human-readable description for logs (e.g., the file path).
    fn describe(&self) -> String;

    fn load(&self) -> Result<Vec<Transaction>, CoreError>;
}

/// An in-memory ledger.
impl TransactionSource for Vec<Transaction> {
    fn describe(&self) -> String {
        format!("in-memory ledger ({} transactions)", self.len())
    }

    fn load(&self) -> Result<Vec<Transaction>, CoreError> {
        Ok(self.clone())
    }
}
