use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::row::RawTransactionRow;
use super::traits::TransactionSource;
use crate::errors::CoreError;
use crate::models::transaction::Transaction;

/// Reads transactions from a headered CSV file:
///
/// ```text
/// timestamp,transaction_type,token,amount
/// 1571967208,DEPOSIT,BTC,0.298660
/// 1571967200,WITHDRAWAL,ETH,0.493839
/// ```
///
/// The file is re-read on every `load`, so edits between valuations are seen.
pub struct CsvTransactionSource {
    path: PathBuf,
}

impl CsvTransactionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransactionSource for CsvTransactionSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<Transaction>, CoreError> {
        let file = std::fs::File::open(&self.path)
            .map_err(|e| CoreError::FileIO(format!("{}: {e}", self.path.display())))?;
        let transactions = read_transactions(std::io::BufReader::new(file))?;
        debug!(
            path = %self.path.display(),
            count = transactions.len(),
            "loaded transactions"
        );
        Ok(transactions)
    }
}

/// Parse every row of a headered CSV stream. The first bad row aborts the read.
pub fn read_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>, CoreError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut transactions = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line());
        let row: RawTransactionRow = record
            .deserialize(Some(&headers))
            .map_err(|e| CoreError::Csv {
                line,
                message: e.to_string(),
            })?;
        transactions.push(row.parse(line)?);
    }

    Ok(transactions)
}
