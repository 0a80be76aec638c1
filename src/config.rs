use dotenvy::dotenv;
use std::env;
use url::Url;

/// Environment-derived configuration for the aggregation pipeline. All
/// external endpoints and curated contract addresses live here so no
/// component reads ambient globals.
#[derive(Debug, Clone)]
pub struct Config {
    pub tzkt_base_url: Url,
    pub teztools_base_url: Url,
    pub objkt_graphql_url: Url,
    pub ipfs_gateway: String,
    pub crunch_contract: String,
    pub crdao_contract: String,
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();

        let tzkt_base_url = env_url("TZKT_API_URL", "https://api.tzkt.io/");
        let teztools_base_url = env_url("TEZTOOLS_API_URL", "https://api.teztools.io/");
        let objkt_graphql_url = env_url("OBJKT_GRAPHQL_URL", "https://data.objkt.com/v2/graphql");

        let ipfs_gateway = env::var("IPFS_GATEWAY")
            .unwrap_or_else(|_| "https://cloudflare-ipfs.com/ipfs/".to_string());

        let crunch_contract = env::var("CONTRACTS_CRUNCH")
            .unwrap_or_else(|_| "KT1BHCumksALJQJ8q8to2EPigPW6qpyTr7Ng".to_string());
        let crdao_contract = env::var("CONTRACTS_CRDAO")
            .unwrap_or_else(|_| "KT1XPFjZqCULSnqfKaaYy8hJjeY63UNSGwXg".to_string());

        Config {
            tzkt_base_url,
            teztools_base_url,
            objkt_graphql_url,
            ipfs_gateway,
            crunch_contract,
            crdao_contract,
        }
    }
}

fn env_url(var: &str, default: &str) -> Url {
    let raw = env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).unwrap_or_else(|_| panic!("Invalid {} value: {}", var, raw))
}
