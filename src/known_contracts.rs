use serde::Deserialize;
use std::sync::OnceLock;

/// Curated display metadata for well-known NFT collection contracts,
/// bundled at build time so no lookup round trip is needed for them.
#[derive(Debug, Clone, Deserialize)]
pub struct KnownContract {
    pub address: String,
    pub name: String,
    #[serde(rename = "thumbnailUrl", default)]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "discoverUrl", default)]
    pub discover_url: Option<String>,
}

static KNOWN_CONTRACTS: OnceLock<Vec<KnownContract>> = OnceLock::new();

pub fn known_contracts() -> &'static [KnownContract] {
    KNOWN_CONTRACTS.get_or_init(|| {
        serde_json::from_str(include_str!("../data/known_contracts.json"))
            .expect("bundled known_contracts.json must parse")
    })
}

/// Contains-match on the registry address, so entries may carry address
/// variants (e.g. with an annex suffix) and still match the bare contract.
pub fn find(address: &str) -> Option<&'static KnownContract> {
    known_contracts()
        .iter()
        .find(|kc| kc.address.contains(address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_registry_parses() {
        assert!(!known_contracts().is_empty());
        for kc in known_contracts() {
            assert!(kc.address.starts_with("KT1"));
            assert!(!kc.name.is_empty());
        }
    }

    #[test]
    fn find_matches_known_address() {
        let found = find("KT1RJ6PbjHpwc3M5rw5s2Nbmefwbuwbdxton").expect("hic et nunc is bundled");
        assert_eq!(found.name, "hic et nunc OBJKTs");
    }

    #[test]
    fn find_misses_unknown_address() {
        assert!(find("KT1VoZeuBMJF6vxtLqEFMoc4no5VDG789D7z").is_none());
    }
}
