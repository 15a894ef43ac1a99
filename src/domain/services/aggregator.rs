use crate::domain::model::{BrandGroup, ListingRecord};
use std::collections::HashMap;

/// Groups listings by brand and sorts each group by price.
///
/// Groups come out in the order their brand first appears in `records`. The
/// sort is stable, so equal prices keep insertion order and unparseable
/// prices end up last.
pub fn aggregate(records: &[ListingRecord]) -> Vec<BrandGroup> {
    let mut groups: Vec<BrandGroup> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let index = *positions.entry(record.brand.as_str()).or_insert_with(|| {
            groups.push(BrandGroup {
                brand: record.brand.clone(),
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[index].records.push(record.clone());
    }

    for group in &mut groups {
        group.records.sort_by_key(|record| record.price);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Price;

    fn listing(brand: &str, name: &str, price: Price) -> ListingRecord {
        ListingRecord {
            id: name.to_string(),
            brand: brand.to_string(),
            name: name.to_string(),
            detail: String::new(),
            price,
            age: String::new(),
            kilometers: String::new(),
        }
    }

    #[test]
    fn test_empty_store_has_no_groups() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_groups_follow_first_appearance() {
        let records = vec![
            listing("Volvo", "v1", Price::Amount(3)),
            listing("Audi", "a1", Price::Amount(2)),
            listing("Volvo", "v2", Price::Amount(1)),
        ];
        let groups = aggregate(&records);
        let brands: Vec<&str> = groups.iter().map(|g| g.brand.as_str()).collect();
        assert_eq!(brands, vec!["Volvo", "Audi"]);
        assert_eq!(groups[0].records.len(), 2);
    }

    #[test]
    fn test_sentinel_prices_sort_last() {
        let records = vec![
            listing("Fiat", "f1", Price::Unparseable),
            listing("Fiat", "f2", Price::Amount(250000)),
            listing("Fiat", "f3", Price::Amount(90000)),
            listing("Fiat", "f4", Price::Unparseable),
            listing("Fiat", "f5", Price::Amount(90000)),
        ];
        let groups = aggregate(&records);
        let names: Vec<&str> = groups[0].records.iter().map(|r| r.name.as_str()).collect();
        // 同價保留原順序
        assert_eq!(names, vec!["f3", "f5", "f2", "f1", "f4"]);

        let prices: Vec<Price> = groups[0].records.iter().map(|r| r.price).collect();
        let first_sentinel = prices.iter().position(|p| *p == Price::Unparseable).unwrap();
        assert!(prices[..first_sentinel].windows(2).all(|w| w[0] <= w[1]));
        assert!(prices[first_sentinel..].iter().all(|p| *p == Price::Unparseable));
    }
}
