use std::collections::HashMap;
use tracing::warn;

use super::types::{AssetLink, Collection, NftItem};
use crate::clients::objkt::ObjktClient;
use crate::clients::objkt_types::FaCollection;
use crate::clients::tzkt_types::TokenBalance;
use crate::config::Config;
use crate::ipfs;
use crate::known_contracts;

const OBJKT_LINK_NAME: &str = "OBJKT";
const OBJKT_LINK_ICON: &str = "https://tezos.art/objkt.png";

/// A collection being assembled: name/art stay unresolved until one of the
/// metadata sources (bundled registry, objkt lookup, first item) fills them.
struct CollectionDraft {
    address: String,
    name: Option<String>,
    art: Option<String>,
    items: Vec<NftItem>,
}

/// Groups NFT balance records by contract address, first-seen order preserved.
pub(crate) fn group_by_contract<'a>(
    records: &[&'a TokenBalance],
) -> Vec<(String, Vec<&'a TokenBalance>)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&TokenBalance>> = HashMap::new();
    for record in records {
        let address = &record.token.contract.address;
        if !groups.contains_key(address) {
            order.push(address.clone());
        }
        groups.entry(address.clone()).or_default().push(*record);
    }
    order
        .into_iter()
        .map(|address| {
            let items = groups.remove(&address).unwrap_or_default();
            (address, items)
        })
        .collect()
}

/// Builds the per-item view for one contract's records. Records with no
/// metadata carry nothing displayable and are skipped.
fn build_items(records: &[&TokenBalance], config: &Config) -> Vec<NftItem> {
    records
        .iter()
        .filter_map(|record| {
            let token = &record.token;
            let metadata = token.metadata.as_ref()?;
            let img_uri = metadata
                .display_uri
                .as_deref()
                .or(metadata.thumbnail_uri.as_deref())
                .unwrap_or("");
            let url = objkt_asset_url(&token.contract.address, token.token_id.as_deref());
            Some(NftItem {
                collection_name: token
                    .contract
                    .alias
                    .clone()
                    .unwrap_or_else(|| token.contract.address.clone()),
                name: metadata.name.clone().unwrap_or_default(),
                art: ipfs::transform_uri(img_uri, &config.ipfs_gateway),
                links: vec![AssetLink {
                    name: OBJKT_LINK_NAME.to_string(),
                    icon: OBJKT_LINK_ICON.to_string(),
                    url,
                }],
            })
        })
        .collect()
}

fn objkt_asset_url(contract: &str, token_id: Option<&str>) -> String {
    format!(
        "https://objkt.com/asset/{}/{}",
        contract,
        token_id.unwrap_or("0")
    )
}

fn assemble_drafts(
    groups: Vec<(String, Vec<&TokenBalance>)>,
    config: &Config,
) -> (Vec<CollectionDraft>, Vec<String>) {
    let mut drafts = Vec::new();
    let mut unknown = Vec::new();
    for (address, records) in groups {
        let mut draft = CollectionDraft {
            items: build_items(&records, config),
            address,
            name: None,
            art: None,
        };
        if let Some(kc) = known_contracts::find(&draft.address) {
            draft.name = Some(kc.name.clone());
            draft.art = kc.thumbnail_url.clone().or_else(|| kc.discover_url.clone());
        } else {
            unknown.push(draft.address.clone());
        }
        drafts.push(draft);
    }
    (drafts, unknown)
}

fn apply_objkt_metadata(drafts: &mut [CollectionDraft], rows: Vec<FaCollection>, config: &Config) {
    for row in rows {
        if let Some(draft) = drafts.iter_mut().find(|d| d.address == row.contract) {
            draft.name = row.name.clone();
            draft.art = Some(ipfs::transform_uri(
                row.logo.as_deref().unwrap_or(""),
                &config.ipfs_gateway,
            ));
        }
    }
}

/// Drops empty collections, fills unresolved name/art from the first item,
/// and orders by descending item count. The sort is stable, so equal-count
/// collections keep their first-seen order.
fn finalize_collections(drafts: Vec<CollectionDraft>) -> Vec<Collection> {
    let mut collections: Vec<Collection> = drafts
        .into_iter()
        .filter(|draft| !draft.items.is_empty())
        .map(|draft| {
            let first = draft.items.first();
            let name = draft
                .name
                .unwrap_or_else(|| first.map(|i| i.collection_name.clone()).unwrap_or_default());
            let art = draft.art.unwrap_or_else(|| {
                first
                    .map(|i| i.art.clone())
                    .unwrap_or_else(|| ipfs::FALLBACK_IMAGE.to_string())
            });
            Collection {
                address: draft.address,
                name,
                art,
                items: draft.items,
            }
        })
        .collect();
    collections.sort_by(|a, b| b.items.len().cmp(&a.items.len()));
    collections
}

/// Full NFT aggregation: group, resolve collection metadata (bundled
/// registry first, then one batched objkt lookup for the rest), finalize.
/// A failed lookup degrades to partial metadata instead of aborting.
pub(crate) async fn build_collections(
    objkt: &ObjktClient,
    records: &[&TokenBalance],
    config: &Config,
) -> Vec<Collection> {
    let groups = group_by_contract(records);
    let (mut drafts, unknown) = assemble_drafts(groups, config);
    if !unknown.is_empty() {
        match objkt.collections(&unknown).await {
            Ok(rows) => apply_objkt_metadata(&mut drafts, rows, config),
            Err(e) => warn!(
                error = %e,
                unresolved = unknown.len(),
                "Collection metadata lookup failed, continuing with partial data"
            ),
        }
    }
    finalize_collections(drafts)
}

/// Finds a collection by exact contract address.
pub fn collection_by_address<'a>(
    collections: &'a [Collection],
    address: &str,
) -> Option<&'a Collection> {
    collections.iter().find(|c| c.address == address)
}
