pub mod assets;
pub mod classifier;
pub mod collections;
pub mod networth;
pub mod types;

use rust_decimal::Decimal;
use tracing::{error, info, instrument};

use crate::clients::coingecko;
use crate::clients::objkt::ObjktClient;
use crate::clients::teztools::TezToolsClient;
use crate::clients::tzkt::TzktClient;
use crate::clients::tzkt_types::TokenBalance;
use crate::config::Config;
use crate::error::AggregatorError;
use self::types::{Asset, AssetBalances, Collection, Holdings};

/// One-shot aggregation over the external indexers. Holds only clients and
/// configuration; nothing is carried between invocations.
#[derive(Debug, Clone)]
pub struct PortfolioAggregator {
    tzkt: TzktClient,
    teztools: TezToolsClient,
    objkt: ObjktClient,
    config: Config,
}

impl PortfolioAggregator {
    pub fn new(config: Config) -> Self {
        Self {
            tzkt: TzktClient::new(&config),
            teztools: TezToolsClient::new(&config),
            objkt: ObjktClient::new(&config),
            config,
        }
    }

    /// The account's NFT holdings grouped into collections. Collection
    /// metadata enrichment degrades gracefully; a failed balance fetch does
    /// not.
    #[instrument(skip(self))]
    pub async fn fetch_holdings(&self, account: &str) -> Result<Holdings, AggregatorError> {
        let balances = self.tzkt.token_balances(account).await?;
        let nfts: Vec<&TokenBalance> = balances.iter().filter(|b| classifier::is_nft(b)).collect();
        let collections = collections::build_collections(&self.objkt, &nfts, &self.config).await;
        info!(
            account = %account,
            nft_count = nfts.len(),
            collection_count = collections.len(),
            "Aggregated NFT holdings"
        );
        Ok(Holdings { collections })
    }

    /// The account's priced fungible holdings, native XTZ first, the rest
    /// sorted by descending value.
    ///
    /// Any upstream failure is logged and yields an empty asset list, so an
    /// empty result can mean either an empty wallet or an unavailable
    /// upstream.
    #[instrument(skip(self))]
    pub async fn fetch_asset_balances(&self, account: &str) -> AssetBalances {
        match self.try_fetch_asset_balances(account).await {
            Ok(assets) => AssetBalances { assets },
            Err(e) => {
                error!(
                    account = %account,
                    error = %e,
                    "Asset aggregation failed, returning empty set"
                );
                AssetBalances { assets: Vec::new() }
            }
        }
    }

    async fn try_fetch_asset_balances(
        &self,
        account: &str,
    ) -> Result<Vec<Asset>, AggregatorError> {
        // The three upstream reads are independent, so issue them together.
        let (balances, pricefeed, usd_rate) = tokio::join!(
            self.tzkt.token_balances(account),
            self.teztools.pricefeed(),
            coingecko::xtz_usd_price(),
        );
        let balances = balances?;
        let prices = pricefeed?.contracts;
        let usd_rate = usd_rate?;

        let mut assets = assets::reconcile_assets(balances, &prices, usd_rate, &self.config);

        let mutez = self.tzkt.native_balance(account).await?;
        assets.insert(0, assets::native_asset(mutez, usd_rate));

        info!(
            account = %account,
            asset_count = assets.len(),
            "Aggregated asset balances"
        );
        Ok(assets)
    }

    /// Reconciled CRUNCH balance, zero when the wallet holds none.
    pub fn crunch_balance(&self, assets: &[Asset]) -> Decimal {
        assets::contract_balance(assets, &self.config.crunch_contract)
    }

    /// Reconciled crDAO balance, zero when the wallet holds none.
    pub fn crdao_balance(&self, assets: &[Asset]) -> Decimal {
        assets::contract_balance(assets, &self.config.crdao_contract)
    }

    /// Finds a collection by its contract address.
    pub fn collection_by_address<'a>(
        &self,
        collections: &'a [Collection],
        address: &str,
    ) -> Option<&'a Collection> {
        collections::collection_by_address(collections, address)
    }
}
