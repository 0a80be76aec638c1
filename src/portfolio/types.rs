use rust_decimal::Decimal;
use serde::Serialize;

/// One reconciled fungible holding, priced in XTZ and USD. `value` and the
/// price-change fields are `None` when the underlying reference data did not
/// yield a finite number.
#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub icon: String,
    pub balance: Decimal,
    pub price: Decimal, // in XTZ
    #[serde(rename = "priceUsd")]
    pub price_usd: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>, // balance * price
    #[serde(rename = "valueUsd", skip_serializing_if = "Option::is_none")]
    pub value_usd: Option<Decimal>,
    #[serde(rename = "priceChange1Day", skip_serializing_if = "Option::is_none")]
    pub price_change_1day: Option<Decimal>,
    #[serde(rename = "priceChange7Day", skip_serializing_if = "Option::is_none")]
    pub price_change_7day: Option<Decimal>,
    #[serde(rename = "priceChange30Day", skip_serializing_if = "Option::is_none")]
    pub price_change_30day: Option<Decimal>,
    pub contract: String,
    #[serde(rename = "tokenId", skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(rename = "assetSlug")]
    pub asset_slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
}

/// Stable per-asset identity: `{contract}` or `{contract}_{tokenId}`.
pub fn asset_slug(contract: &str, token_id: Option<&str>) -> String {
    match token_id {
        Some(id) => format!("{}_{}", contract, id),
        None => contract.to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetBalances {
    pub assets: Vec<Asset>,
}

/// One NFT collection contract and the account's items in it.
#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    pub address: String,
    pub name: String,
    pub art: String,
    pub items: Vec<NftItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NftItem {
    #[serde(rename = "collectionName")]
    pub collection_name: String,
    pub name: String,
    pub art: String,
    pub links: Vec<AssetLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetLink {
    pub name: String,
    pub icon: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Holdings {
    pub collections: Vec<Collection>,
}
