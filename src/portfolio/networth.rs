use rust_decimal::Decimal;

use super::types::Asset;

/// Total portfolio value in XTZ. Assets whose value never resolved to a
/// finite number are skipped.
pub fn sum_value(assets: &[Asset]) -> Decimal {
    assets.iter().filter_map(|asset| asset.value).sum()
}

/// Total portfolio value in USD, skipping unresolved entries.
pub fn sum_usd_value(assets: &[Asset]) -> Decimal {
    assets.iter().filter_map(|asset| asset.value_usd).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn asset(value: Option<Decimal>, value_usd: Option<Decimal>) -> Asset {
        Asset {
            symbol: "TOK".to_string(),
            name: None,
            icon: String::new(),
            balance: Decimal::ONE,
            price: Decimal::ONE,
            price_usd: Decimal::ONE,
            value,
            value_usd,
            price_change_1day: None,
            price_change_7day: None,
            price_change_30day: None,
            contract: "KT1A".to_string(),
            token_id: None,
            asset_slug: "KT1A".to_string(),
            decimals: None,
        }
    }

    #[test]
    fn sums_skip_unresolved_values() {
        let assets = vec![
            asset(Some(dec!(10)), Some(dec!(20))),
            asset(None, None),
            asset(Some(dec!(5)), Some(dec!(10))),
        ];
        assert_eq!(sum_value(&assets), dec!(15));
        assert_eq!(sum_usd_value(&assets), dec!(30));
    }

    #[test]
    fn sum_is_order_independent() {
        let a = asset(Some(dec!(1)), None);
        let b = asset(Some(dec!(2)), None);
        let c = asset(None, None);
        assert_eq!(
            sum_value(&[a.clone(), b.clone(), c.clone()]),
            sum_value(&[c, b, a])
        );
    }

    #[test]
    fn empty_list_sums_to_zero() {
        assert_eq!(sum_value(&[]), Decimal::ZERO);
        assert_eq!(sum_usd_value(&[]), Decimal::ZERO);
    }
}
