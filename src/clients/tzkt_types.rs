use serde::{Deserialize, Serialize};

// TzKT `tokens/balances` response structures (select=token,balance)

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalance {
    pub token: TokenInfo,
    pub balance: String, // arbitrary-precision integer, smallest token unit
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    pub contract: ContractRef,
    #[serde(rename = "tokenId", default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub standard: Option<String>, // "fa1.2" or "fa2"
    #[serde(default)]
    pub metadata: Option<TokenMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractRef {
    pub address: String,
    #[serde(default)]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: Option<String>, // TzKT serves decimals as a string
    #[serde(rename = "artifactUri", default)]
    pub artifact_uri: Option<String>,
    #[serde(rename = "displayUri", default)]
    pub display_uri: Option<String>,
    #[serde(rename = "thumbnailUri", default)]
    pub thumbnail_uri: Option<String>,
    #[serde(default)]
    pub formats: Option<serde_json::Value>,
}

impl TokenMetadata {
    /// Lenient parse of the string-typed decimals field.
    pub fn parsed_decimals(&self) -> Option<u32> {
        self.decimals.as_ref().and_then(|d| d.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_fungible_balance() {
        let raw = r#"{
            "token": {
                "contract": { "address": "KT1K9gCRgaLRFKTErYt1wVxA3Frb9FjasjTV", "alias": "Kolibri USD" },
                "tokenId": "0",
                "standard": "fa1.2",
                "metadata": { "name": "Kolibri USD", "symbol": "kUSD", "decimals": "18" }
            },
            "balance": "200000000000000000000"
        }"#;
        let balance: TokenBalance = serde_json::from_str(raw).unwrap();
        assert_eq!(balance.token.contract.alias.as_deref(), Some("Kolibri USD"));
        assert_eq!(balance.token.standard.as_deref(), Some("fa1.2"));
        let metadata = balance.token.metadata.unwrap();
        assert_eq!(metadata.symbol.as_deref(), Some("kUSD"));
        assert_eq!(metadata.parsed_decimals(), Some(18));
    }

    #[test]
    fn deserializes_nft_balance_with_media_fields() {
        let raw = r#"{
            "token": {
                "contract": { "address": "KT1RJ6PbjHpwc3M5rw5s2Nbmefwbuwbdxton" },
                "tokenId": "734506",
                "standard": "fa2",
                "metadata": {
                    "name": "Quiet hills",
                    "artifactUri": "ipfs://QmArtifact",
                    "displayUri": "ipfs://QmDisplay",
                    "thumbnailUri": "ipfs://QmThumb",
                    "formats": [{ "mimeType": "image/png", "uri": "ipfs://QmArtifact" }]
                }
            },
            "balance": "1"
        }"#;
        let balance: TokenBalance = serde_json::from_str(raw).unwrap();
        let metadata = balance.token.metadata.unwrap();
        assert_eq!(metadata.artifact_uri.as_deref(), Some("ipfs://QmArtifact"));
        assert!(metadata.formats.is_some());
        assert_eq!(metadata.parsed_decimals(), None);
    }

    #[test]
    fn tolerates_missing_metadata() {
        let raw = r#"{
            "token": { "contract": { "address": "KT1TjnZYs5CGLbmV6yuW169P8Pnr9BiVwwjz" } },
            "balance": "42"
        }"#;
        let balance: TokenBalance = serde_json::from_str(raw).unwrap();
        assert!(balance.token.metadata.is_none());
        assert!(balance.token.token_id.is_none());
    }
}
