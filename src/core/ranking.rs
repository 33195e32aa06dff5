use crate::domain::model::AnnotatedOffer;
use std::cmp::Ordering;

/// Primary-destination offers before alternates, cheapest first within each
/// group. Stable: equal keys keep their accumulation order.
pub fn rank(mut offers: Vec<AnnotatedOffer>) -> Vec<AnnotatedOffer> {
    offers.sort_by(compare_offers);
    offers
}

pub fn compare_offers(a: &AnnotatedOffer, b: &AnnotatedOffer) -> Ordering {
    (!a.is_primary())
        .cmp(&!b.is_primary())
        .then_with(|| a.total_price.total_cmp(&b.total_price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{IataCode, SearchInfo};
    use crate::domain::testing::offer;

    fn annotated(id: &str, dest: &str, primary: bool, price: f64) -> AnnotatedOffer {
        let mut raw = offer(&price.to_string());
        raw.id = Some(id.to_string());
        AnnotatedOffer {
            offer: raw,
            search_info: SearchInfo {
                origin_airport: IataCode::parse("BOM").unwrap(),
                destination_airport: IataCode::parse(dest).unwrap(),
                is_primary: primary,
            },
            total_price: price,
        }
    }

    fn ids(offers: &[AnnotatedOffer]) -> Vec<String> {
        offers.iter().map(|o| o.offer.id.clone().unwrap()).collect()
    }

    #[test]
    fn test_primary_before_cheaper_alternate() {
        let ranked = rank(vec![
            annotated("alt-cheap", "GOX", false, 1800.0),
            annotated("primary-expensive", "GOI", true, 9200.0),
            annotated("primary-cheap", "GOI", true, 4100.0),
            annotated("alt-expensive", "IXG", false, 7000.0),
        ]);

        assert_eq!(
            ids(&ranked),
            vec!["primary-cheap", "primary-expensive", "alt-cheap", "alt-expensive"]
        );
    }

    #[test]
    fn test_equal_keys_keep_accumulation_order() {
        let ranked = rank(vec![
            annotated("first", "GOX", false, 5000.0),
            annotated("p1", "GOI", true, 5000.0),
            annotated("second", "IXG", false, 5000.0),
            annotated("p2", "GOI", true, 5000.0),
        ]);

        assert_eq!(ids(&ranked), vec!["p1", "p2", "first", "second"]);
    }

    #[test]
    fn test_ranked_output_satisfies_ordering() {
        let prices = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let input: Vec<AnnotatedOffer> = prices
            .iter()
            .enumerate()
            .map(|(i, p)| annotated(&i.to_string(), "GOI", i % 3 == 0, *p))
            .collect();

        let ranked = rank(input);
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(!(b.is_primary() && !a.is_primary()));
            if a.is_primary() == b.is_primary() {
                assert!(a.total_price <= b.total_price);
            }
        }
    }
}
