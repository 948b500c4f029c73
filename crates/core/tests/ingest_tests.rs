// ═══════════════════════════════════════════════════════════════════
// Ingest Tests — RawTransactionRow parsing, CSV reading, sources
// ═══════════════════════════════════════════════════════════════════

use rust_decimal_macros::dec;

use portfolio_valuation_core::errors::CoreError;
use portfolio_valuation_core::ingest::csv_source::{read_transactions, CsvTransactionSource};
use portfolio_valuation_core::ingest::row::RawTransactionRow;
use portfolio_valuation_core::ingest::traits::TransactionSource;
use portfolio_valuation_core::models::transaction::{Transaction, TransactionType};

fn row(timestamp: &str, kind: &str, token: &str, amount: &str) -> RawTransactionRow {
    RawTransactionRow {
        timestamp: timestamp.into(),
        transaction_type: kind.into(),
        token: token.into(),
        amount: amount.into(),
    }
}

// ── Row parsing ─────────────────────────────────────────────────────

mod row_parsing {
    use super::*;

    #[test]
    fn parses_valid_row() {
        let tx = row("1571967208", "DEPOSIT", "BTC", "0.298660").parse(None).unwrap();
        assert_eq!(tx, Transaction::deposit(1_571_967_208, "BTC", dec!(0.298660)));
    }

    #[test]
    fn parses_withdrawal() {
        let tx = row("1", "WITHDRAWAL", "ETH", "2").parse(None).unwrap();
        assert_eq!(tx.kind, TransactionType::Withdrawal);
    }

    #[test]
    fn trims_numeric_fields() {
        let tx = row(" 42 ", "DEPOSIT", "XRP", " 10.5 ").parse(None).unwrap();
        assert_eq!(tx.timestamp, 42);
        assert_eq!(tx.amount, dec!(10.5));
    }

    #[test]
    fn accepts_scientific_amount() {
        let tx = row("1", "DEPOSIT", "BTC", "1e-8").parse(None).unwrap();
        assert_eq!(tx.amount, dec!(0.00000001));
    }

    #[test]
    fn bad_timestamp_names_field() {
        let err = row("yesterday", "DEPOSIT", "BTC", "1").parse(Some(4)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidNumber { line: Some(4), field: "timestamp", ref value } if value == "yesterday"
        ));
    }

    #[test]
    fn fractional_timestamp_rejected() {
        let err = row("1.5", "DEPOSIT", "BTC", "1").parse(None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidNumber { field: "timestamp", .. }));
    }

    #[test]
    fn bad_amount_names_field() {
        let err = row("1", "DEPOSIT", "BTC", "NaN").parse(None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidNumber { field: "amount", .. }));
    }

    #[test]
    fn empty_amount_rejected() {
        let err = row("1", "DEPOSIT", "BTC", "").parse(None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidNumber { field: "amount", .. }));
    }

    #[test]
    fn unknown_kind_rejected_with_line() {
        let err = row("1", "deposit", "BTC", "1").parse(Some(9)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnknownTransactionType { line: Some(9), ref value } if value == "deposit"
        ));
    }

    #[test]
    fn negative_amount_rejected() {
        let err = row("1", "DEPOSIT", "BTC", "-1").parse(None).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn empty_token_rejected() {
        let err = row("1", "DEPOSIT", "", "1").parse(None).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn token_case_preserved() {
        let tx = row("1", "DEPOSIT", "eth", "1").parse(None).unwrap();
        assert_eq!(tx.asset, "eth");
    }
}

// ── CSV reading ─────────────────────────────────────────────────────

mod csv_reading {
    use super::*;

    const SAMPLE: &str = "timestamp,transaction_type,token,amount\n\
                          1571967208,DEPOSIT,BTC,0.298660\n\
                          1571967200,WITHDRAWAL,ETH,0.493839\n\
                          1571967189,DEPOSIT,XRP,0.728577\n";

    #[test]
    fn reads_rows_in_arrival_order() {
        let txs = read_transactions(SAMPLE.as_bytes()).unwrap();
        assert_eq!(txs.len(), 3);
        assert_eq!(txs[0].asset, "BTC");
        assert_eq!(txs[1].kind, TransactionType::Withdrawal);
        assert_eq!(txs[2].timestamp, 1_571_967_189);
    }

    #[test]
    fn header_only_yields_empty_ledger() {
        let txs = read_transactions("timestamp,transaction_type,token,amount\n".as_bytes()).unwrap();
        assert!(txs.is_empty());
    }

    #[test]
    fn columns_matched_by_header_name() {
        let data = "token,amount,timestamp,transaction_type\nBTC,2,1,DEPOSIT\n";
        let txs = read_transactions(data.as_bytes()).unwrap();
        assert_eq!(txs, vec![Transaction::deposit(1, "BTC", dec!(2))]);
    }

    #[test]
    fn padded_headers_accepted() {
        let data = "timestamp, transaction_type, token, amount\n1,DEPOSIT,BTC,2\n";
        let txs = read_transactions(data.as_bytes()).unwrap();
        assert_eq!(txs.len(), 1);
    }

    #[test]
    fn missing_column_is_csv_error() {
        let data = "timestamp,transaction_type,token\n1,DEPOSIT,BTC\n";
        let err = read_transactions(data.as_bytes()).unwrap_err();
        assert!(matches!(err, CoreError::Csv { line: Some(2), .. }));
    }

    #[test]
    fn ragged_row_is_csv_error() {
        let data = "timestamp,transaction_type,token,amount\n1,DEPOSIT,BTC\n";
        let err = read_transactions(data.as_bytes()).unwrap_err();
        assert!(matches!(err, CoreError::Csv { .. }));
    }

    #[test]
    fn bad_row_reports_its_line() {
        let data = "timestamp,transaction_type,token,amount\n\
                    1,DEPOSIT,BTC,1\n\
                    2,DEPOSIT,BTC,oops\n";
        let err = read_transactions(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidNumber { line: Some(3), field: "amount", .. }
        ));
    }
}

// ── Sources ─────────────────────────────────────────────────────────

mod sources {
    use super::*;

    #[test]
    fn csv_source_reads_file_each_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.csv");
        std::fs::write(&path, "timestamp,transaction_type,token,amount\n1,DEPOSIT,BTC,1\n").unwrap();

        let source = CsvTransactionSource::new(&path);
        assert_eq!(source.load().unwrap().len(), 1);

        std::fs::write(
            &path,
            "timestamp,transaction_type,token,amount\n1,DEPOSIT,BTC,1\n2,DEPOSIT,ETH,3\n",
        )
        .unwrap();
        assert_eq!(source.load().unwrap().len(), 2);
    }

    #[test]
    fn csv_source_missing_file_is_file_io() {
        let source = CsvTransactionSource::new("/no/such/transactions.csv");
        let err = source.load().unwrap_err();
        assert!(matches!(err, CoreError::FileIO(ref msg) if msg.contains("/no/such/transactions.csv")));
    }

    #[test]
    fn csv_source_describes_path() {
        let source = CsvTransactionSource::new("ledger.csv");
        assert_eq!(source.describe(), "ledger.csv");
    }

    #[test]
    fn vec_source_replays() {
        let ledger = vec![
            Transaction::deposit(1, "BTC", dec!(1)),
            Transaction::withdrawal(2, "BTC", dec!(0.25)),
        ];
        assert_eq!(ledger.load().unwrap(), ledger);
        assert_eq!(ledger.load().unwrap(), ledger);
        assert!(ledger.describe().contains("2 transactions"));
    }
}
