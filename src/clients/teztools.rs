use governor::{DefaultDirectRateLimiter, Quota};
use nonzero_ext::*;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::teztools_types::PricefeedResponse;
use crate::config::Config;
use crate::error::AggregatorError;

const SERVICE: &str = "teztools";

struct PricefeedRateLimiter {
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl reqwest_ratelimit::RateLimiter for PricefeedRateLimiter {
    async fn acquire_permit(&self) {
        self.rate_limiter.until_ready().await;
    }
}

/// Client for the TezTools price feed. The feed covers every listed token in
/// one response, so the client is rate limited to one request per second.
#[derive(Debug, Clone)]
pub struct TezToolsClient {
    http_client: ClientWithMiddleware,
    base_url: Url,
}

impl TezToolsClient {
    pub fn new(config: &Config) -> Self {
        let reqwest_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(500), Duration::from_millis(1000))
            .build_with_max_retries(3);

        let rate_limiter = PricefeedRateLimiter {
            rate_limiter: Arc::new(DefaultDirectRateLimiter::direct(Quota::per_second(
                nonzero!(1u32),
            ))),
        };

        let http_client = ClientBuilder::new(reqwest_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .with(reqwest_ratelimit::all(rate_limiter))
            .build();

        Self {
            http_client,
            base_url: config.teztools_base_url.clone(),
        }
    }

    /// Current prices and trading-pair closes for all listed tokens.
    #[instrument(skip(self))]
    pub async fn pricefeed(&self) -> Result<PricefeedResponse, AggregatorError> {
        let url = self
            .base_url
            .join("v1/prices")
            .map_err(|e| AggregatorError::url(SERVICE, e))?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| AggregatorError::network(SERVICE, e))?
            .error_for_status()
            .map_err(|e| AggregatorError::network(SERVICE, e))?;

        let feed: PricefeedResponse = response
            .json()
            .await
            .map_err(|e| AggregatorError::decode(SERVICE, e))?;
        debug!(contract_count = feed.contracts.len(), "Fetched price feed");
        Ok(feed)
    }
}
