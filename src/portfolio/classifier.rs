use crate::clients::tzkt_types::TokenBalance;

/// A balance is a fungible token when it has no artifact URI, carries a
/// symbol or contract alias, and lists no media formats. Best-effort
/// heuristic over indexer metadata, not a protocol guarantee.
pub fn is_fungible(record: &TokenBalance) -> bool {
    let token = &record.token;
    let metadata = token.metadata.as_ref();
    let has_artifact = metadata.map_or(false, |m| m.artifact_uri.is_some());
    let has_symbol = metadata.map_or(false, |m| m.symbol.is_some());
    let has_alias = token.contract.alias.is_some();
    let has_formats = metadata.map_or(false, |m| m.formats.is_some());
    !has_artifact && (has_symbol || has_alias) && !has_formats
}

pub fn is_nft(record: &TokenBalance) -> bool {
    !is_fungible(record)
}
