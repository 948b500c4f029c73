pub mod errors;
pub mod ingest;
pub mod models;
pub mod providers;
pub mod services;

use ingest::{csv_source::CsvTransactionSource, traits::TransactionSource};
use models::{
    balance::BalanceMap,
    settings::Settings,
    valuation::{AssetValuation, ValuationRequest},
};
use providers::{cryptocompare::CryptoCompareProvider, traits::RateProvider};
use rust_decimal::Decimal;
use services::{ledger_service::LedgerService, valuation_service::ValuationService};
use tracing::info;

use errors::CoreError;

/// Main entry point for the Portfolio Valuation core library.
///
/// Pairs a transaction source with a rate provider. Nothing is retained
/// between calls: every valuation reloads the ledger, rebuilds its balances
/// and prices them afresh, so concurrent valuations need no coordination.
#[must_use]
pub struct PortfolioValuator {
    source: Box<dyn TransactionSource>,
    provider: Box<dyn RateProvider>,
    ledger_service: LedgerService,
    valuation_service: ValuationService,
}

impl std::fmt::Debug for PortfolioValuator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioValuator")
            .field("source", &self.source.describe())
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl PortfolioValuator {
    pub fn new(
        source: impl TransactionSource + 'static,
        provider: impl RateProvider + 'static,
    ) -> Self {
        Self::from_parts(Box::new(source), Box::new(provider))
    }

    pub fn from_parts(source: Box<dyn TransactionSource>, provider: Box<dyn RateProvider>) -> Self {
        Self {
            source,
            provider,
            ledger_service: LedgerService::new(),
            valuation_service: ValuationService::new(),
        }
    }

    /// CSV ledger at `settings.transactions_path`, priced by CryptoCompare.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            CsvTransactionSource::new(settings.transactions_path.clone()),
            CryptoCompareProvider::from_settings(&settings.cryptocompare),
        )
    }

    /// Swap the rate provider, keeping the transaction source.
    pub fn with_provider(self, provider: impl RateProvider + 'static) -> Self {
        Self::from_parts(self.source, Box::new(provider))
    }

    // ── Balances ────────────────────────────────────────────────────

    /// Per-asset balances as of `cutoff` (inclusive; `None` = all transactions).
    pub fn balances(&self, cutoff: Option<i64>) -> Result<BalanceMap, CoreError> {
        let transactions = self.source.load()?;
        self.ledger_service.aggregate(&transactions, cutoff)
    }

    // ── Valuation ───────────────────────────────────────────────────

    /// Total value in the reference currency for `request`.
    pub async fn value(&self, request: &ValuationRequest) -> Result<Decimal, CoreError> {
        let balances = self.balances(request.cutoff)?;
        let total = self
            .valuation_service
            .value(self.provider.as_ref(), &balances, request.asset_filter.as_deref())
            .await?;

        info!(
            cutoff = ?request.cutoff,
            asset = ?request.asset_filter,
            %total,
            "portfolio valued"
        );
        Ok(total)
    }

    /// Per-asset priced lines for `request`, in symbol order.
    pub async fn breakdown(
        &self,
        request: &ValuationRequest,
    ) -> Result<Vec<AssetValuation>, CoreError> {
        let balances = self.balances(request.cutoff)?;
        self.valuation_service
            .breakdown(self.provider.as_ref(), &balances, request.asset_filter.as_deref())
            .await
    }

    /// Value of everything held, counting every transaction.
    pub async fn latest_value(&self) -> Result<Decimal, CoreError> {
        self.value(&ValuationRequest::latest()).await
    }

    /// Value of one asset's holdings, counting every transaction.
    pub async fn latest_value_of(&self, asset: &str) -> Result<Decimal, CoreError> {
        self.value(&ValuationRequest::latest().for_asset(asset)).await
    }

    /// Value of everything held at `cutoff`, priced at today's rates.
    pub async fn value_at(&self, cutoff: i64) -> Result<Decimal, CoreError> {
        self.value(&ValuationRequest::at(cutoff)).await
    }

    /// Value of one asset's holdings at `cutoff`, priced at today's rates.
    pub async fn value_of_at(&self, asset: &str, cutoff: i64) -> Result<Decimal, CoreError> {
        self.value(&ValuationRequest::at(cutoff).for_asset(asset)).await
    }
}
