use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// TezTools price feed response structures

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricefeedResponse {
    pub contracts: Vec<PriceRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(rename = "tokenAddress")]
    pub token_address: String,
    #[serde(rename = "tokenId", default)]
    pub token_id: Option<u64>,
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "currentPrice", default)]
    pub current_price: Option<Decimal>, // in XTZ
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(rename = "thumbnailUri", default)]
    pub thumbnail_uri: Option<String>,
    #[serde(default)]
    pub pairs: Vec<PricePair>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePair {
    #[serde(default)]
    pub dex: Option<String>,
    #[serde(default)]
    pub sides: Vec<PairSide>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairSide {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(rename = "dayClose", default)]
    pub day_close: Option<Decimal>,
    #[serde(rename = "weekClose", default)]
    pub week_close: Option<Decimal>,
    #[serde(rename = "monthClose", default)]
    pub month_close: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn deserializes_pricefeed_contract() {
        let raw = r#"{
            "contracts": [{
                "tokenAddress": "KT1BHCumksALJQJ8q8to2EPigPW6qpyTr7Ng",
                "tokenId": 0,
                "symbol": "CRUNCH",
                "name": "CRUNCH",
                "currentPrice": 0.00249,
                "decimals": 8,
                "thumbnailUri": "ipfs://QmThumb",
                "pairs": [{
                    "dex": "Quipuswap",
                    "sides": [
                        { "symbol": "CRUNCH", "dayClose": 0.0025, "weekClose": 0.0027, "monthClose": 0.003 },
                        { "symbol": "XTZ" }
                    ]
                }]
            }]
        }"#;
        let feed: PricefeedResponse = serde_json::from_str(raw).unwrap();
        let record = &feed.contracts[0];
        assert_eq!(record.symbol.as_deref(), Some("CRUNCH"));
        assert_eq!(record.current_price, Some(dec!(0.00249)));
        assert_eq!(record.pairs[0].sides[1].symbol.as_deref(), Some("XTZ"));
        assert_eq!(record.pairs[0].sides[0].week_close, Some(dec!(0.0027)));
    }

    #[test]
    fn tolerates_sparse_records() {
        let raw = r#"{ "contracts": [{ "tokenAddress": "KT1GRSvLoikDsXujKgZPsGLX8k8VvR2Tq95b" }] }"#;
        let feed: PricefeedResponse = serde_json::from_str(raw).unwrap();
        let record = &feed.contracts[0];
        assert!(record.current_price.is_none());
        assert!(record.pairs.is_empty());
    }
}
