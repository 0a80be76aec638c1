use dotenvy::dotenv;
use tracing::info;

use tezos_portfolio_aggregator::config;
use tezos_portfolio_aggregator::logging;
use tezos_portfolio_aggregator::portfolio::networth;
use tezos_portfolio_aggregator::portfolio::PortfolioAggregator;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    // Load configuration
    let cfg = config::Config::load();
    info!(tzkt = %cfg.tzkt_base_url, "Configuration loaded and logging initialized");

    let account = std::env::var("PORTFOLIO_ACCOUNT")
        .map_err(|_| eyre::eyre!("Missing PORTFOLIO_ACCOUNT"))?;

    let aggregator = PortfolioAggregator::new(cfg);

    // NFT holdings grouped into collections
    let holdings = aggregator.fetch_holdings(&account).await?;
    for collection in &holdings.collections {
        info!(
            name = %collection.name,
            address = %collection.address,
            item_count = collection.items.len(),
            "Collection"
        );
    }

    // Priced fungible holdings and net worth
    let balances = aggregator.fetch_asset_balances(&account).await;
    for asset in &balances.assets {
        info!(
            symbol = %asset.symbol,
            balance = %asset.balance,
            value = ?asset.value,
            value_usd = ?asset.value_usd,
            "Asset"
        );
    }
    info!(
        asset_count = balances.assets.len(),
        net_worth = %networth::sum_value(&balances.assets),
        net_worth_usd = %networth::sum_usd_value(&balances.assets),
        "Portfolio aggregated"
    );

    tokio::time::sleep(std::time::Duration::from_secs(1)).await; // Allow time for logging to flush

    Ok(())
}
