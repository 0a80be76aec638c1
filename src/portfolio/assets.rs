use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use std::str::FromStr;
use tracing::{debug, warn};

use super::types::{asset_slug, Asset};
use crate::clients::teztools_types::{PairSide, PriceRecord};
use crate::clients::tzkt_types::{ContractRef, TokenBalance, TokenInfo, TokenMetadata};
use crate::config::Config;
use crate::ipfs;

/// Reference pair for price-change math: the Quipuswap pool whose counter
/// side is the native currency.
const REFERENCE_DEX: &str = "Quipuswap";
const NATIVE_SYMBOL: &str = "XTZ";
const NATIVE_DECIMALS: u32 = 6;
const NATIVE_SLUG: &str = "tez";

const CRUNCH_THUMBNAIL: &str =
    "https://ipfs.fleek.co/ipfs/bafybeienhhbxz53n3gtg7stjou2zs3lmhupahwovv2kxwh5uass3bc5xzq";
const CRDAO_THUMBNAIL: &str =
    "https://ipfs.fleek.co/ipfs/bafybeigulbzm5x72qtmckxqvd3ksk6q3vlklxjgpnvvnbcofgdp6qwu43u";

const XTZ_ICON: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAIAAAACACAMAAAD04JH5AAABC1BMVEUAAABCfe5LcORAfetCffBDfe9CffBCfe9Cf/BBfe9Df/JBe+xDeu5Df/JCfvBCfO9Cfe9Cfe9DfvBDfvBBfe9BffA+eu9Df/JCfe8+eeVCfvFCfe9Cfe9Cfu5BffBCffBBfu8+fO9CffJEf/JEfe9CfvFDfu////9Ff+/8/f8+e+87eO9FgvdGg/rr8f5EgPRWjPFTifFAfO9Ghfz0+P5gk/I4d+5Hhv+vyPg3du7n7/1Ef/BIgvD5+v+hv/dOhvBomPNajvHP3vu50PpvnPPv9P7d6PzW5PyMsfbn7v3H2fvB1fp5pPTj7P1ml/KIrfWCqfWow/irxvi0zPmzyvmZufeStPaWt/Ywce7hqexUAAAAJnRSTlMA/QMTxv6QilFW0DQM9a9K8d7WwrYuB/nqHJnL4l4ooHMXQ9p0cw375J8AAAlzSURBVHja1VsHe9JAGE7CHqWD2ta21h2uGQQCJEZWyxbtcv//X+J3hMuJwh2XxEf9nhaoIO9737z1SUKiKIunRCH3LF1KHpzsyarc3js/SJbSr3OFBPnMH5LFFx9dZNPJ/T3LNQ3DardVkLZlGUbDNfb2y+ncxVH8HOi4EtnTM7nRMA1L9kVdiP86ZRmm2ZDP0rsJyiFO+KPc0xOrYbYpMhXKo202rJPTXJFoLDbdP8rsG67lY7MEf8Byjf30o9goKPCTPZRd4ydwLgmjIR/u4v8Zy+izZaPRBnQBAVs0rHJWiewLCsAnDZMxeIYaTKu8C18RDb5QMk1ADyWYwmGBUAiFX8wcE/hwFFKNnUxCUsIOfzcPtlcjCfjCS2IH8eFbBh+ebwfDOC1Kijh+Ie8ytC9kB/esIM7gyY5B8SMrYeeJ4PCVjEmsHwsFy8wIOIIiJUo85xePyBKNBi7+86R7DPjxMnCThAEX/3HeJPBxUjDzjwkDDv4BwY+ZQeMAGMQ7/vh1AP6Xb1D82HWQf85jkEgyxo+IhNdBMsFRQMlljF8jEpqC7JYUhYWfYdkf1a9rC6nrekgGKbmRAZiN+E/MlLwR3u4Pqr68G7acsCpImU8AaAP+ox1LVhkEqhUi3V5HReEYWDuPNjEo5lnlF/DeVy4X8PDUrGkopA6MfHGDAk5ZDohV0JlXiLyraeEdEdxgHf6uwSkASEOBDqoRCBwbu+sYFPexATgM6tVKZAJghIPiugjkZ0Bk19/FQEAlsbg6A6MRwNLA21gIpIJIoAQOqQLECYir4FBRfvFAK0XfFycg7gbZVRUcMWrQHyFgJpUVBWSZDhA/ATW1qgKlbEYjEEkFwOQFSwGIik0JXNuII9urQFGYIaDpGhGnH+SBuqP9JvqKIF4gAAFSBY9VRhW8bgVyPSKZcDwK/pnK7VUgt1ctpo0AkOQCeEy78maz126aP0mFSHONXP4szZmHuDWJXwWAwLgSTi5nHtsJ9otLBeSMFItA9bJLx0W/fpOQj8DzVxsxNECSkSI9dRkeoF13w2qg8t5m2+Cpb4PECSsI7f7DGyqfiBN0h2/Wy8MNxUc2Yk7OThJ+GeDMA3QqXicIw76nrxHte2sc4KsYn8kAbIBjgCaByInI7t/wx09tcArwjDoknIoR0mDO5uMPYfzcdHyG99YvjtXYCDjfCP5HXWXhk1x0AQRyYIF4CCB9BPA+vkbw2ek4BwTSZkwEwAH8d+n4uTZIA4FyXARUew7YGP+B4HMJlCELnBvxEEBOb4nfI/j8idl5QirsWbEQQM4HDI/xnW1X77K1V4BCIEciQN8aL/F1Lj4tB1ZOegaFIBYTDABcDB+noleQB+MggLyPYvg0DEpGDASQc3/p4zsC8NgLS1IyBgJIvx4T+6sikrKS0oEVgwY6U0DH41fFCMjWgXTejkwAeZ+wAyzsL0igfSLtRSaAvNkCf/YdTwiEKMDJt9SG50gEkH7bXGxbXd99vRvVNM8WigMJHiIRQHZnghXQnPrrhfd3HUdk1RadgD4k+0bLGfG7Xt3b3hklORoB5H0FfMJg+TueadsqoR3RCZEz6i7G3W02u0t4/DCv62hLJzyJQgBp/QlGnN+1Ov3Wh49vAwoTnyCXwHnERGQPYfCfWpqj2bbmeP2v1YBBXUNbJaKklQpNAP7udj+3wOtBVPi1vfqAMBjY29SCpGgxugnWBZiA3e/dOjoAI20Bh5DeCRh88dAWxUigHNOYB+m2dLQIQoCHyVB12LGXUUk2Uy/HfDeQG2nplSuLxOGcjO/eQf6YAbMGmPfL8SLnjsTkG4dLwH0m5SxZQAXeQ7Dy0YNU3J9WupUZVfh0qaUmmIl3qJwTmpQC2CjYIbn1Ogvf82oAeNm91RGtTXR6yp2UCk3LQWwyvMpNy9M13bPvIfJgKaojuqNN9lQmHZs/LZe2W5vSyTchUBn3Rq3RbFBZlKKWhqia/ECAN3gbVWaZLM0E3PANYQDSJS/vQAGUQI985M7hEEiTxamAQPLDOqeJH28GUSCqJRwHHuIvTi92VCEVqPaX6s+bVFB/7wk+maGQRfKcVZIA9hgvz4/OwAZCDLz6lwHdMKw+1Al+sK81XhKYdjj7xUeMwzJWQvTU69Gs93k4/NT7UPc0tLZiAIGbvo3YeVAhW/VCAtGP94UdkDXTUKRtebIkW3B6xtim4+5cdbBg+I0EcDlgb9MxNir5vqB7nqcTHYtqgG5Ugg3C3BiCAjz68tD70KGO/rsTThg+IKegEChkszoljl8b+On2ig7ytzAcMPPwfjE4sxS3gV2f+LmAZOG1iWjosSwAMRAc26uikeiRjEwLM9XAN5KKv3mIkYXwgQU9tRR0wPYkKAlNYuiAQHDEfaUj/tml74YpUQ+o0m35X72gT9676diMIHwBwEQUqMmRCVAXIMZ5cBCjElN4cRXgXfHABN26vUqOWOASLMDeqpfCq0AfbHBCpF9VaC1k16EVFQgS8L4QDYxXwhDZ6pQQGG0mkPLLAAj77JJ1lNT0YQa3K/iq9pngDzVWCFD8IBekhBg4fiKoXn9HIKRA6epnkoSqdQ1tvspTAEiBKxyM6yTVe9XTFwszW3O00ZTgNxkGWH+dqnhgCDHQP1z6YFOYlHQArFO7n1covoOYVUD8Gg8VugAhjti9mc4Hky7dJLkBfMFrPOI1CTmzLtQj/EMEXuG/up/6oH/mYRnjKpcIg9vBApaKf6Z5pWsMfOPsiHmZTcgP1Lv5Lye7015L0xESvcxGr/OJTtHt2v3H+WSCL/lNBp9nrY6jATznOh/nQqMYBU33HNTH1xw7Og5IxFmNQQSyumlKrhxifgw5QNNs/JJ7Wlsi+JxLrcIsmOA0AyUT3Gvdf/Zab0JS/u2Lzf7VbqKDuPEPAP/fv9yOGSSSrizHDH/sJuFa919scGiUEiItFpCRrFhbPIyMIin/T5OLf8n0zE3J8eC7+UKYRqPiqRGHEmTDyhQJvmir18s4Wr3yL6TQ3WaJzE4jih1k2TzGw4/S7ndoRWn3M0qFyB2Hu2UrbMOjkcwS+Cj9tkoWKIRo+TTKAB9P16myeyg3xJpeXfkwp8TYdysV0rjtV+WSkEGshrGfeRR753Exd7pV47NrnTzNHf2R3mspsZuG1m/TNKzU763fkO/NBrR+n2YTf7L9/Ogily6T5nfLb35vW4YBA8fN71lofhfTfaT2/3N88i3vneD2/2ch2/9/ABtem2hAUcJLAAAAAElFTkSuQmCC";

/// Filters price records down to the balance's contract; when several match,
/// disambiguates by symbol (when the balance carries metadata) or token id,
/// then takes the first survivor. Input order comes straight from the feed,
/// so the tie-break is stable across runs.
pub(crate) fn match_price<'a>(
    record: &TokenBalance,
    prices: &'a [PriceRecord],
) -> Option<&'a PriceRecord> {
    let mut candidates: Vec<&PriceRecord> = prices
        .iter()
        .filter(|p| p.token_address == record.token.contract.address)
        .collect();

    if candidates.len() > 1 {
        if let Some(metadata) = &record.token.metadata {
            candidates.retain(|p| p.symbol.as_deref() == metadata.symbol.as_deref());
        } else if let Some(token_id) = &record.token.token_id {
            candidates
                .retain(|p| p.token_id.map(|id| id.to_string()).as_deref() == Some(token_id.as_str()));
        }
    }

    candidates.first().copied()
}

/// Token id for the reconciled asset: the price feed's id wins, a typed feed
/// entry without one implies id 0, and the balance record is the last resort.
fn resolve_token_id(price: Option<&PriceRecord>, token: &TokenInfo) -> Option<String> {
    if let Some(price) = price {
        if let Some(id) = price.token_id {
            return Some(id.to_string());
        }
        if price.token_type.is_some() {
            return Some("0".to_string());
        }
    }
    token.token_id.clone()
}

/// Decimals precedence: token metadata, then price feed, then the
/// standard-based default (fa1.2 tokens default to 3, everything else to 6).
fn resolve_decimals(token: &TokenInfo, price: Option<&PriceRecord>) -> u32 {
    token
        .metadata
        .as_ref()
        .and_then(|m| m.parsed_decimals())
        .or_else(|| price.and_then(|p| p.decimals))
        .unwrap_or_else(|| {
            if token.standard.as_deref() == Some("fa1.2") {
                3
            } else {
                6
            }
        })
}

fn parse_raw_balance(record: &TokenBalance) -> Decimal {
    Decimal::from_str(&record.balance).unwrap_or_else(|_| {
        warn!(balance = %record.balance, "Failed to parse raw balance");
        Decimal::ZERO
    })
}

fn scale_down(raw: Decimal, decimals: u32) -> Decimal {
    match Decimal::from(10u32).checked_powi(decimals as i64) {
        Some(divisor) if !divisor.is_zero() => raw / divisor,
        _ => {
            warn!(decimals, "Unrepresentable decimals factor");
            Decimal::ZERO
        }
    }
}

/// `(price - close) / close * 100`; a zero or missing close has no finite
/// answer and yields `None`.
fn percentage_change(price: Decimal, reference_close: Option<Decimal>) -> Option<Decimal> {
    let close = reference_close?;
    if close.is_zero() {
        return None;
    }
    Some((price - close) / close * Decimal::from(100))
}

/// The base side of the reference pair (dex and native counter symbol match).
fn reference_side(price: &PriceRecord) -> Option<&PairSide> {
    price
        .pairs
        .iter()
        .find(|pair| {
            pair.dex.as_deref() == Some(REFERENCE_DEX)
                && pair.sides.get(1).and_then(|s| s.symbol.as_deref()) == Some(NATIVE_SYMBOL)
        })
        .and_then(|pair| pair.sides.first())
}

fn compute_asset(
    record: &TokenBalance,
    price_record: &PriceRecord,
    current_price: Decimal,
    usd_rate: Decimal,
    config: &Config,
) -> Asset {
    let token = &record.token;
    let metadata = token.metadata.as_ref();

    let decimals = resolve_decimals(token, Some(price_record));
    let balance = scale_down(parse_raw_balance(record), decimals);

    let price_usd = current_price * usd_rate;
    let value = balance * current_price;
    let value_usd = balance * price_usd;

    // The balance indexer omits thumbnails for some tokens; the price feed
    // fills the gap.
    let icon_uri = metadata
        .and_then(|m| m.thumbnail_uri.as_deref())
        .or(price_record.thumbnail_uri.as_deref())
        .unwrap_or("");

    let side = reference_side(price_record);
    let token_id = resolve_token_id(Some(price_record), token);

    Asset {
        symbol: price_record
            .symbol
            .clone()
            .or_else(|| metadata.and_then(|m| m.symbol.clone()))
            .or_else(|| token.contract.alias.clone())
            .unwrap_or_default(),
        name: price_record.name.clone(),
        icon: ipfs::transform_uri(icon_uri, &config.ipfs_gateway),
        balance,
        price: current_price,
        price_usd,
        value: Some(value),
        value_usd: Some(value_usd),
        price_change_1day: percentage_change(current_price, side.and_then(|s| s.day_close)),
        price_change_7day: percentage_change(current_price, side.and_then(|s| s.week_close)),
        price_change_30day: percentage_change(current_price, side.and_then(|s| s.month_close)),
        asset_slug: asset_slug(&token.contract.address, token_id.as_deref()),
        contract: token.contract.address.clone(),
        token_id,
        decimals: metadata.and_then(|m| m.parsed_decimals()),
    }
}

fn placeholder_balance(address: &str, symbol: &str, name: Option<&str>, thumbnail: &str) -> TokenBalance {
    TokenBalance {
        token: TokenInfo {
            contract: ContractRef {
                address: address.to_string(),
                alias: None,
            },
            token_id: Some("0".to_string()),
            standard: None,
            metadata: Some(TokenMetadata {
                name: name.map(str::to_string),
                symbol: Some(symbol.to_string()),
                decimals: Some("8".to_string()),
                thumbnail_uri: Some(thumbnail.to_string()),
                ..Default::default()
            }),
        },
        balance: "0".to_string(),
    }
}

/// Appends zero-balance records for the curated token contracts when the
/// wallet holds neither, so both show up (at zero value) once priced.
pub(crate) fn inject_known_tokens(balances: &mut Vec<TokenBalance>, config: &Config) {
    if !balances
        .iter()
        .any(|b| b.token.contract.address == config.crunch_contract)
    {
        balances.push(placeholder_balance(
            &config.crunch_contract,
            "CRUNCH",
            None,
            CRUNCH_THUMBNAIL,
        ));
    }
    if !balances
        .iter()
        .any(|b| b.token.contract.address == config.crdao_contract)
    {
        balances.push(placeholder_balance(
            &config.crdao_contract,
            "crDAO",
            Some("Crunchy DAO"),
            CRDAO_THUMBNAIL,
        ));
    }
}

/// Local reconciliation step: inject curated placeholders, keep fungible
/// records, price them, and sort by descending value. Balances with no
/// resolvable non-zero price are dropped here.
pub(crate) fn reconcile_assets(
    mut balances: Vec<TokenBalance>,
    prices: &[PriceRecord],
    usd_rate: Decimal,
    config: &Config,
) -> Vec<Asset> {
    inject_known_tokens(&mut balances, config);

    let mut assets = Vec::new();
    for record in balances.iter().filter(|r| super::classifier::is_fungible(r)) {
        let Some(price_record) = match_price(record, prices) else {
            debug!(
                contract = %record.token.contract.address,
                "No price feed match, dropping balance"
            );
            continue;
        };
        let Some(current_price) = price_record.current_price.filter(|p| !p.is_zero()) else {
            debug!(
                contract = %record.token.contract.address,
                "No current price, dropping balance"
            );
            continue;
        };
        assets.push(compute_asset(
            record,
            price_record,
            current_price,
            usd_rate,
            config,
        ));
    }

    assets.sort_by(|a, b| b.value.cmp(&a.value));
    assets
}

/// The native holding, always first in the final list. Price is the unit
/// price of the native currency in itself, so `value == balance`.
pub(crate) fn native_asset(mutez: u64, usd_rate: Decimal) -> Asset {
    let balance = scale_down(Decimal::from(mutez), NATIVE_DECIMALS);
    Asset {
        symbol: NATIVE_SYMBOL.to_string(),
        name: Some(NATIVE_SLUG.to_string()),
        icon: XTZ_ICON.to_string(),
        balance,
        price: Decimal::ONE,
        price_usd: usd_rate,
        value: Some(balance),
        value_usd: Some(balance * usd_rate),
        price_change_1day: None,
        price_change_7day: None,
        price_change_30day: None,
        contract: NATIVE_SLUG.to_string(),
        token_id: None,
        asset_slug: NATIVE_SLUG.to_string(),
        decimals: Some(NATIVE_DECIMALS),
    }
}

/// Balance of the asset at `contract`, zero when the wallet lacks it.
pub fn contract_balance(assets: &[Asset], contract: &str) -> Decimal {
    assets
        .iter()
        .find(|a| a.contract == contract)
        .map(|a| a.balance)
        .unwrap_or(Decimal::ZERO)
}
