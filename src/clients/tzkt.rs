use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::tzkt_types::TokenBalance;
use crate::config::Config;
use crate::error::AggregatorError;

const SERVICE: &str = "tzkt";
const PAGE_LIMIT: u32 = 10_000;

/// Client for the TzKT indexer: token balances and the native account balance.
#[derive(Debug, Clone)]
pub struct TzktClient {
    http_client: ClientWithMiddleware,
    base_url: Url,
}

impl TzktClient {
    pub fn new(config: &Config) -> Self {
        let reqwest_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(500), Duration::from_millis(1000))
            .build_with_max_retries(3);

        let http_client = ClientBuilder::new(reqwest_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Self {
            http_client,
            base_url: config.tzkt_base_url.clone(),
        }
    }

    /// All positive token balances held by `account`, in indexer order.
    #[instrument(skip(self))]
    pub async fn token_balances(&self, account: &str) -> Result<Vec<TokenBalance>, AggregatorError> {
        let url = self
            .base_url
            .join("v1/tokens/balances")
            .map_err(|e| AggregatorError::url(SERVICE, e))?;
        let params = [
            ("account", account.to_string()),
            ("balance.gt", "0".to_string()),
            ("limit", PAGE_LIMIT.to_string()),
            ("select", "token,balance".to_string()),
        ];

        let response = self
            .http_client
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| AggregatorError::network(SERVICE, e))?
            .error_for_status()
            .map_err(|e| AggregatorError::network(SERVICE, e))?;

        let balances: Vec<TokenBalance> = response
            .json()
            .await
            .map_err(|e| AggregatorError::decode(SERVICE, e))?;
        debug!(account = %account, count = balances.len(), "Fetched token balances");
        Ok(balances)
    }

    /// The account's spendable native balance in mutez.
    #[instrument(skip(self))]
    pub async fn native_balance(&self, account: &str) -> Result<u64, AggregatorError> {
        let url = self
            .base_url
            .join(&format!("v1/accounts/{}/balance", account))
            .map_err(|e| AggregatorError::url(SERVICE, e))?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| AggregatorError::network(SERVICE, e))?
            .error_for_status()
            .map_err(|e| AggregatorError::network(SERVICE, e))?;

        let mutez: u64 = response
            .json()
            .await
            .map_err(|e| AggregatorError::decode(SERVICE, e))?;
        debug!(account = %account, mutez = mutez, "Fetched native balance");
        Ok(mutez)
    }
}
