use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::traits::RateProvider;
use crate::errors::CoreError;

/// Fixed quotes held in memory, keyed by symbol. Used for offline runs.
///
/// Every quote is assumed to already be in the requested currency.
#[derive(Debug, Clone, Default)]
pub struct StaticRateProvider {
    rates: HashMap<String, Decimal>,
}

impl StaticRateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, symbol: impl Into<String>, rate: Decimal) -> Self {
        self.rates.insert(symbol.into(), rate);
        self
    }
}

impl FromIterator<(String, Decimal)> for StaticRateProvider {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    fn name(&self) -> &str {
        "Static"
    }

    async fn get_rate(&self, symbol: &str, currency: &str) -> Result<Decimal, CoreError> {
        self.rates
            .get(symbol)
            .copied()
            .ok_or_else(|| CoreError::PriceNotAvailable {
                symbol: symbol.to_string(),
                currency: currency.to_string(),
            })
    }
}
