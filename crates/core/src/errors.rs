use thiserror::Error;

/// Unified error type for the entire portfolio-valuation-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Ingestion ───────────────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("CSV error{}: {message}", line_suffix(.line))]
    Csv { line: Option<u64>, message: String },

    #[error("Invalid {field} '{value}'{}", line_suffix(.line))]
    InvalidNumber {
        line: Option<u64>,
        field: &'static str,
        value: String,
    },

    #[error("Unknown transaction type '{value}'{} (expected DEPOSIT or WITHDRAWAL)", line_suffix(.line))]
    UnknownTransactionType { line: Option<u64>, value: String },

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Price not available for {symbol} in {currency}")]
    PriceNotAvailable { symbol: String, currency: String },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Arithmetic overflow while valuing {0}")]
    Overflow(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

fn line_suffix(line: &Option<u64>) -> String {
    match line {
        Some(line) => format!(" at line {line}"),
        None => String::new(),
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        let line = e.position().map(|p| p.line());
        CoreError::Csv {
            line,
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(e: toml::de::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; strip the query so API keys never surface.
        CoreError::Network(redact_query(&e.to_string()))
    }
}

/// Replace everything after the first `?` with a placeholder.
pub fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}
