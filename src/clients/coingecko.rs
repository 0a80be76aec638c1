use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, warn};

use crate::error::AggregatorError;

const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const SERVICE: &str = "coingecko";
const MAX_RETRIES: usize = 3;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct SimplePriceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vs_currencies: Option<String>,
}

/// Current XTZ price in USD.
pub async fn xtz_usd_price() -> Result<Decimal, AggregatorError> {
    let request = SimplePriceRequest {
        ids: Some("tezos".to_string()),
        vs_currencies: Some("usd".to_string()),
    };
    let mut last_err = None;
    for attempt in 1..=MAX_RETRIES {
        match try_simple_price(&request).await {
            Ok(prices) => {
                return prices
                    .get("tezos")
                    .and_then(|per_currency| per_currency.get("usd"))
                    .copied()
                    .ok_or_else(|| {
                        AggregatorError::unexpected(SERVICE, "missing tezos.usd rate")
                    });
            }
            Err(e) => {
                last_err = Some(e);
                warn!(
                    attempt,
                    error = ?last_err.as_ref().unwrap(),
                    "Attempt to fetch XTZ/USD rate from CoinGecko failed",
                );
                tokio::time::sleep(std::time::Duration::from_millis(500 * attempt as u64)).await;
            }
        }
    }
    error!(
        attempts = MAX_RETRIES,
        error = ?last_err.as_ref().unwrap(),
        "All attempts to fetch XTZ/USD rate from CoinGecko failed",
    );
    Err(last_err
        .unwrap_or_else(|| AggregatorError::unexpected(SERVICE, "rate fetch failed with no error")))
}

async fn try_simple_price(
    request: &SimplePriceRequest,
) -> Result<HashMap<String, HashMap<String, Decimal>>, AggregatorError> {
    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(|e| AggregatorError::network(SERVICE, e))?;
    let query_string = serde_url_params::to_string(request)
        .map_err(|e| AggregatorError::unexpected(SERVICE, e.to_string()))?;
    let url = format!("{}/simple/price?{}", COINGECKO_BASE_URL, query_string);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| AggregatorError::network(SERVICE, e))?;

    response
        .error_for_status_ref()
        .map_err(|e| AggregatorError::network(SERVICE, e))?;
    response
        .json()
        .await
        .map_err(|e| AggregatorError::decode(SERVICE, e))
}
