use rust_decimal::Decimal;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::balance::BalanceMap;
use crate::models::valuation::{passes_filter, AssetValuation, REFERENCE_CURRENCY};
use crate::providers::traits::RateProvider;

/// Converts balances into the reference currency.
///
/// Rates are requested one asset at a time, in ascending symbol order, and
/// every non-reference asset in the map is priced even when a filter will
/// drop its contribution. The first failed lookup aborts the valuation;
/// there is never a partial total.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Sum of `balance * rate` over the assets that pass `asset_filter`.
    pub async fn value(
        &self,
        provider: &dyn RateProvider,
        balances: &BalanceMap,
        asset_filter: Option<&str>,
    ) -> Result<Decimal, CoreError> {
        let lines = self.breakdown(provider, balances, asset_filter).await?;
        lines.iter().try_fold(Decimal::ZERO, |total, line| {
            total
                .checked_add(line.value)
                .ok_or_else(|| CoreError::Overflow(format!("portfolio total at {}", line.asset)))
        })
    }

    /// One priced line per asset that passes `asset_filter`, in symbol order.
    pub async fn breakdown(
        &self,
        provider: &dyn RateProvider,
        balances: &BalanceMap,
        asset_filter: Option<&str>,
    ) -> Result<Vec<AssetValuation>, CoreError> {
        let mut lines = Vec::new();

        for (asset, balance) in balances.iter() {
            let rate = self.unit_rate(provider, asset).await?;

            if !passes_filter(asset_filter, asset) {
                continue;
            }

            let value = balance
                .checked_mul(rate)
                .ok_or_else(|| CoreError::Overflow(format!("{balance} {asset} at {rate}")))?;
            lines.push(AssetValuation {
                asset: asset.to_string(),
                balance,
                rate,
                value,
            });
        }

        Ok(lines)
    }

    /// Price of one unit of `asset` in the reference currency.
    /// The reference currency itself is always 1 and never hits the provider.
    pub async fn unit_rate(
        &self,
        provider: &dyn RateProvider,
        asset: &str,
    ) -> Result<Decimal, CoreError> {
        if asset == REFERENCE_CURRENCY {
            return Ok(Decimal::ONE);
        }

        let rate = provider.get_rate(asset, REFERENCE_CURRENCY).await?;
        debug!(provider = provider.name(), asset, %rate, "resolved spot rate");
        Ok(rate)
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
