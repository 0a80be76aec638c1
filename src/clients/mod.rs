pub mod coingecko;
pub mod objkt;
pub mod objkt_types;
pub mod teztools;
pub mod teztools_types;
pub mod tzkt;
pub mod tzkt_types;
