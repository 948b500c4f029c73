use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::CoreError;

/// Trait abstraction for spot-rate sources.
///
/// The valuation engine only ever asks for the current unit price of one
/// symbol in one quote currency. Implementations must not retry or cache:
/// each call is an independent, freshest-available lookup, and any failure
/// is returned as-is so the enclosing valuation can abort.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Current spot price of one unit of `symbol`, expressed in `currency`.
    async fn get_rate(&self, symbol: &str, currency: &str) -> Result<Decimal, CoreError>;
}
