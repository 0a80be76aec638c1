use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::objkt_types::{FaCollection, GraphqlRequest, GraphqlResponse};
use crate::config::Config;
use crate::error::AggregatorError;

const SERVICE: &str = "objkt";

/// Client for the objkt.com GraphQL API. Collection metadata for any number
/// of contracts is resolved in a single batched query.
#[derive(Debug, Clone)]
pub struct ObjktClient {
    http_client: ClientWithMiddleware,
    graphql_url: Url,
}

impl ObjktClient {
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
            graphql_url: config.objkt_graphql_url.clone(),
        }
    }

    /// Collection metadata for all given contract addresses, one round trip.
    #[instrument(skip(self), fields(contract_count = addresses.len()))]
    pub async fn collections(
        &self,
        addresses: &[String],
    ) -> Result<Vec<FaCollection>, AggregatorError> {
        let request = GraphqlRequest {
            query: contracts_query(addresses),
        };

        let response = self
            .http_client
            .post(self.graphql_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| AggregatorError::network(SERVICE, e))?
            .error_for_status()
            .map_err(|e| AggregatorError::network(SERVICE, e))?;

        let body: GraphqlResponse = response
            .json()
            .await
            .map_err(|e| AggregatorError::decode(SERVICE, e))?;

        if let Some(errors) = body.errors {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AggregatorError::unexpected(SERVICE, message));
        }

        let collections = body.data.map(|d| d.fa).unwrap_or_default();
        debug!(resolved = collections.len(), "Fetched collection metadata");
        Ok(collections)
    }
}

fn contracts_query(addresses: &[String]) -> String {
    let contract_list =
        serde_json::to_string(addresses).expect("a list of strings always serializes");
    format!(
        r#"
    query contracts {{
      fa(where: {{contract: {{_in: {}}}}}) {{
        collection_id
        contract
        description
        editions
        logo
        metadata
        name
        collection_type
      }}
    }}
    "#,
        contract_list
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_inlines_the_address_list() {
        let query = contracts_query(&[
            "KT1VoZeuBMJF6vxtLqEFMoc4no5VDG789D7z".to_string(),
            "KT1RJ6PbjHpwc3M5rw5s2Nbmefwbuwbdxton".to_string(),
        ]);
        assert!(query.contains(
            r#"_in: ["KT1VoZeuBMJF6vxtLqEFMoc4no5VDG789D7z","KT1RJ6PbjHpwc3M5rw5s2Nbmefwbuwbdxton"]"#
        ));
        assert!(query.contains("collection_type"));
    }
}
