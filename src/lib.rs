pub mod clients;
pub mod config;
pub mod error;
pub mod ipfs;
pub mod known_contracts;
pub mod logging;
pub mod portfolio;

pub use config::Config;
pub use error::AggregatorError;
pub use portfolio::PortfolioAggregator;
