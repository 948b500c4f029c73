pub mod traits;

// Rate provider implementations
pub mod cryptocompare;
pub mod static_rates;
