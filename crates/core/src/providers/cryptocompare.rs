use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use super::traits::RateProvider;
use crate::errors::CoreError;
use crate::models::settings::{CryptoCompareSettings, DEFAULT_CRYPTOCOMPARE_URL, DEFAULT_TIMEOUT_SECS};

const PROVIDER: &str = "CryptoCompare";

/// CryptoCompare API provider for spot prices.
///
/// - **Endpoint**: `/data/price?fsym={symbol}&tsyms={currency}`
/// - **Success body**: `{"USD": 20000.5}`
/// - **Error body**: `{"Response": "Error", "Message": "..."}` (served with HTTP 200)
/// - **Auth**: optional; sent as an `authorization: Apikey ...` header, never in the URL.
pub struct CryptoCompareProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CryptoCompareProvider {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: DEFAULT_CRYPTOCOMPARE_URL.to_string(),
            api_key: None,
        }
    }

    pub fn from_settings(settings: &CryptoCompareSettings) -> Self {
        let provider = Self::with_timeout(Duration::from_secs(settings.timeout_secs))
            .with_base_url(&settings.base_url);
        match &settings.api_key {
            Some(key) => provider.with_api_key(key),
            None => provider,
        }
    }

    /// Point the provider at a different host (mirrors, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn api_error(message: String) -> CoreError {
        CoreError::Api {
            provider: PROVIDER.into(),
            message,
        }
    }
}

impl Default for CryptoCompareProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for CryptoCompareProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_rate(&self, symbol: &str, currency: &str) -> Result<Decimal, CoreError> {
        let url = format!("{}/data/price", self.base_url);
        debug!(provider = PROVIDER, symbol, currency, "requesting spot rate");

        let mut request = self
            .client
            .get(&url)
            .query(&[("fsym", symbol), ("tsyms", currency)])
            .header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("authorization", format!("Apikey {key}"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::api_error(format!(
                "HTTP {status} for {symbol}: {}",
                body.trim()
            )));
        }

        let body: HashMap<String, Value> = response
            .json()
            .await
            .map_err(|e| Self::api_error(format!("Failed to parse response for {symbol}: {e}")))?;

        parse_price_body(&body, symbol, currency)
    }
}

/// Interpret a decoded `/data/price` body.
pub fn parse_price_body(
    body: &HashMap<String, Value>,
    symbol: &str,
    currency: &str,
) -> Result<Decimal, CoreError> {
    if body.get("Response").and_then(Value::as_str) == Some("Error") {
        let message = body
            .get("Message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(CryptoCompareProvider::api_error(format!(
            "{symbol}/{currency}: {message}"
        )));
    }

    let price = match body.get(currency) {
        Some(Value::Number(n)) => decimal_from_number(n).ok_or_else(|| {
            CryptoCompareProvider::api_error(format!("Invalid price format for {symbol}: {n}"))
        })?,
        Some(other) => {
            return Err(CryptoCompareProvider::api_error(format!(
                "Invalid price format for {symbol}: {other}"
            )))
        }
        None => {
            return Err(CoreError::PriceNotAvailable {
                symbol: symbol.to_string(),
                currency: currency.to_string(),
            })
        }
    };

    if price < Decimal::ZERO {
        return Err(CryptoCompareProvider::api_error(format!(
            "Invalid price returned for {symbol}: {price} (must be non-negative)"
        )));
    }

    Ok(price)
}

/// serde_json prints very small or large floats in exponent form ("1.2e-5").
fn decimal_from_number(n: &serde_json::Number) -> Option<Decimal> {
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
