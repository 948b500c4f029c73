use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// The fixed currency every valuation is expressed in.
pub const REFERENCE_CURRENCY: &str = "USD";

/// Parameters of a single valuation: when, and optionally which asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValuationRequest {
    /// Inclusive upper timestamp bound; `None` includes every transaction.
    pub cutoff: Option<i64>,

    /// Restrict the total to one asset's contribution.
    pub asset_filter: Option<String>,
}

impl ValuationRequest {
    /// Whole portfolio, all transactions.
    pub fn latest() -> Self {
        Self::default()
    }

    /// Whole portfolio as of `cutoff` (inclusive).
    pub fn at(cutoff: i64) -> Self {
        Self {
            cutoff: Some(cutoff),
            asset_filter: None,
        }
    }

    /// Whole portfolio as of UTC midnight at the start of `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::at(start_of_day_timestamp(date))
    }

    /// Narrow this request to a single asset.
    pub fn for_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset_filter = Some(asset.into());
        self
    }
}

/// Exact name match against an optional filter; no filter admits every asset.
/// The reference currency gets no special treatment here.
pub fn passes_filter(filter: Option<&str>, asset: &str) -> bool {
    filter.is_none_or(|filter| filter == asset)
}

/// Seconds since the epoch at 00:00:00 UTC on `date`.
pub fn start_of_day_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// One priced line of a valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetValuation {
    pub asset: String,
    pub balance: Decimal,
    /// Unit price in the reference currency
    pub rate: Decimal,
    /// `balance * rate`
    pub value: Decimal,
}
