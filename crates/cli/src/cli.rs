//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::{Decimal, RoundingStrategy};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

use portfolio_valuation_core::errors::CoreError;
use portfolio_valuation_core::models::settings::Settings;
use portfolio_valuation_core::models::valuation::{
    start_of_day_timestamp, AssetValuation, ValuationRequest,
};
use portfolio_valuation_core::providers::static_rates::StaticRateProvider;
use portfolio_valuation_core::PortfolioValuator;

#[derive(Parser, Debug)]
#[command(
    name = "portfolio-valuation",
    about = "Value a deposit/withdrawal ledger in USD",
    version
)]
pub struct Cli {
    /// TOML settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Transactions CSV (overrides the settings file)
    #[arg(short, long, global = true)]
    pub transactions: Option<PathBuf>,

    /// Fixed quote instead of a live lookup, e.g. --rate BTC=20000 (repeatable)
    #[arg(long = "rate", value_name = "SYMBOL=PRICE", value_parser = parse_rate, global = true)]
    pub rates: Vec<(String, Decimal)>,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the four standard valuations (default)
    Scenarios {
        /// Asset for the single-asset valuations
        #[arg(long, default_value = "BTC")]
        token: String,
        /// Historical cutoff date (UTC midnight)
        #[arg(long, default_value = "2022-01-01", value_parser = parse_date)]
        date: NaiveDate,
        /// Asset for the historical single-asset valuation
        #[arg(long, default_value = "ETH")]
        date_token: String,
    },
    /// Run one valuation
    Value {
        /// Include transactions up to UTC midnight of this date
        #[arg(long, value_parser = parse_date, conflicts_with = "at_timestamp")]
        at: Option<NaiveDate>,
        /// Include transactions up to this Unix timestamp (inclusive)
        #[arg(long)]
        at_timestamp: Option<i64>,
        /// Only count this asset
        #[arg(long)]
        asset: Option<String>,
        /// Print one line per asset before the total
        #[arg(long)]
        breakdown: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Scenarios {
            token: "BTC".into(),
            date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            date_token: "ETH".into(),
        }
    }
}

pub async fn run(cli: Cli) -> Result<(), CoreError> {
    let valuator = build_valuator(&cli)?;
    debug!(?valuator, "valuator ready");

    match cli.command.unwrap_or_default() {
        Command::Scenarios {
            token,
            date,
            date_token,
        } => {
            let cutoff = start_of_day_timestamp(date);

            let latest = valuator.latest_value().await?;
            println!("Latest portfolio value: {}", format_usd(latest));

            let latest_token = valuator.latest_value_of(&token).await?;
            println!(
                "Latest portfolio value for {token}: {}",
                format_usd(latest_token)
            );

            let on_date = valuator.value_at(cutoff).await?;
            println!("Portfolio value on {date}: {}", format_usd(on_date));

            let token_on_date = valuator.value_of_at(&date_token, cutoff).await?;
            println!(
                "Portfolio value of {date_token} on {date}: {}",
                format_usd(token_on_date)
            );
        }
        Command::Value {
            at,
            at_timestamp,
            asset,
            breakdown,
        } => {
            let request = ValuationRequest {
                cutoff: at_timestamp.or(at.map(start_of_day_timestamp)),
                asset_filter: asset,
            };

            if breakdown {
                let lines = valuator.breakdown(&request).await?;
                for line in &lines {
                    println!(
                        "{:<8} {:>20} @ {:>14} = {}",
                        line.asset,
                        line.balance.normalize(),
                        line.rate.normalize(),
                        format_usd(line.value)
                    );
                }
                println!("Total: {}", format_usd(sum_lines(&lines)?));
            } else {
                let total = valuator.value(&request).await?;
                println!("{}", format_usd(total));
            }
        }
    }

    Ok(())
}

fn build_valuator(cli: &Cli) -> Result<PortfolioValuator, CoreError> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    }
    .with_env_overrides();

    if let Some(path) = &cli.transactions {
        settings.transactions_path = path.clone();
    }

    let valuator = PortfolioValuator::from_settings(&settings);
    if cli.rates.is_empty() {
        return Ok(valuator);
    }

    let provider: StaticRateProvider = cli.rates.iter().cloned().collect();
    Ok(valuator.with_provider(provider))
}

fn sum_lines(lines: &[AssetValuation]) -> Result<Decimal, CoreError> {
    lines.iter().try_fold(Decimal::ZERO, |total, line| {
        total
            .checked_add(line.value)
            .ok_or_else(|| CoreError::Overflow(format!("portfolio total at {}", line.asset)))
    })
}

/// Currency text with two decimals, half away from zero: `$1234.57`.
pub fn format_usd(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}

fn parse_rate(s: &str) -> Result<(String, Decimal), String> {
    let (symbol, price) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SYMBOL=PRICE, got '{s}'"))?;
    if symbol.is_empty() {
        return Err(format!("missing symbol in '{s}'"));
    }
    let price = Decimal::from_str(price.trim()).map_err(|e| format!("invalid price in '{s}': {e}"))?;
    if price < Decimal::ZERO {
        return Err(format!("negative price in '{s}'"));
    }
    Ok((symbol.to_string(), price))
}
