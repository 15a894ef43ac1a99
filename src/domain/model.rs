use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// 無法解析價格時寫入的字面值
pub const UNPARSEABLE_PRICE: &str = "N/A";

/// 無法辨識品牌時使用的標籤
pub const UNKNOWN_BRAND: &str = "Unknown";

/// Pipeline flavour. `Slim` skips the snapshot and dedup stages entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Full,
    Slim,
}

impl Variant {
    pub fn default_max_items(&self) -> usize {
        match self {
            Variant::Full => 17,
            Variant::Slim => 6,
        }
    }

    pub fn requires_info(&self) -> bool {
        matches!(self, Variant::Full)
    }

    pub fn deduplicates(&self) -> bool {
        matches!(self, Variant::Full)
    }

    pub fn persists_snapshot(&self) -> bool {
        matches!(self, Variant::Full)
    }
}

/// Asking price of a listing.
///
/// `Unparseable` marks price text that was present but not a number. It orders
/// after every `Amount`, so unpriced listings sort last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Price {
    Amount(u64),
    Unparseable,
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(value) => write!(f, "{}", value),
            Price::Unparseable => f.write_str(UNPARSEABLE_PRICE),
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Price::Amount(value) => serializer.serialize_u64(*value),
            Price::Unparseable => serializer.serialize_str(UNPARSEABLE_PRICE),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // 快照裡的價格是整數，或任何非數字的值 (通常是 "N/A")
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StoredPrice {
            Amount(u64),
            Other(serde_json::Value),
        }

        Ok(match StoredPrice::deserialize(deserializer)? {
            StoredPrice::Amount(value) => Price::Amount(value),
            StoredPrice::Other(_) => Price::Unparseable,
        })
    }
}

/// Text pulled out of one listing element, trimmed but otherwise untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFields {
    pub name: String,
    pub model: String,
    pub price: String,
    pub info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: String,
    pub brand: String,
    pub name: String,
    pub detail: String,
    pub price: Price,
    pub age: String,
    pub kilometers: String,
}

/// Append-only collection of listings with unique ids, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<ListingRecord>,
    ids: HashSet<String>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由快照重建；重複的 id 只保留第一筆
    pub fn from_records(records: Vec<ListingRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Appends the record unless its id is already present.
    pub fn insert(&mut self, record: ListingRecord) -> bool {
        if !self.ids.insert(record.id.clone()) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// 不檢查 id，用於不去重的精簡模式
    pub(crate) fn push_unchecked(&mut self, record: ListingRecord) {
        self.ids.insert(record.id.clone());
        self.records.push(record);
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PartialEq for RecordStore {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Eq for RecordStore {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub appended: usize,
    pub duplicates: usize,
}

/// Listings of one brand, cheapest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandGroup {
    pub brand: String,
    pub records: Vec<ListingRecord>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub store: RecordStore,
    pub stats: MergeStats,
    pub groups: Vec<BrandGroup>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, price: Price) -> ListingRecord {
        ListingRecord {
            id: id.to_string(),
            brand: "Škoda".to_string(),
            name: "Škoda Octavia".to_string(),
            detail: "2.0 TDI".to_string(),
            price,
            age: "2019".to_string(),
            kilometers: "120000 km".to_string(),
        }
    }

    #[test]
    fn test_sentinel_orders_after_every_amount() {
        assert!(Price::Amount(u64::MAX) < Price::Unparseable);
        assert!(Price::Amount(0) < Price::Amount(1));
        assert_eq!(Price::Unparseable.to_string(), "N/A");
        assert_eq!(Price::Amount(189000).to_string(), "189000");
    }

    #[test]
    fn test_record_json_layout() {
        let json = serde_json::to_string(&record("abc", Price::Amount(250000))).unwrap();
        assert_eq!(
            json,
            r#"{"id":"abc","brand":"Škoda","name":"Škoda Octavia","detail":"2.0 TDI","price":250000,"age":"2019","kilometers":"120000 km"}"#
        );

        let json = serde_json::to_string(&record("abc", Price::Unparseable)).unwrap();
        assert!(json.contains(r#""price":"N/A""#));
    }

    #[test]
    fn test_price_reads_back_from_snapshot_values() {
        let price: Price = serde_json::from_str("42").unwrap();
        assert_eq!(price, Price::Amount(42));
        let price: Price = serde_json::from_str("\"N/A\"").unwrap();
        assert_eq!(price, Price::Unparseable);
        let price: Price = serde_json::from_str("-1").unwrap();
        assert_eq!(price, Price::Unparseable);
    }

    #[test]
    fn test_store_keeps_first_of_repeated_ids() {
        let store = RecordStore::from_records(vec![
            record("a", Price::Amount(1)),
            record("b", Price::Amount(2)),
            record("a", Price::Amount(3)),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].price, Price::Amount(1));
        assert!(store.contains("b"));
    }
}
