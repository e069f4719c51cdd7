//! CLI subcommand implementations.

pub mod health;
pub mod history;
pub mod price;
pub mod quote;
pub mod recommendations;
pub mod watchlist;
