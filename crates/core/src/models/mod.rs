pub mod balance;
pub mod settings;
pub mod transaction;
pub mod valuation;
