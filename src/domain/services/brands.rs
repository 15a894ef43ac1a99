use crate::domain::model::{Variant, UNKNOWN_BRAND};

/// 完整版品牌表；順序有意義 (先比對到者勝出)
pub const FULL_BRANDS: &[&str] = &[
    "Alfa Romeo",
    "Kia",
    "Lexus",
    "Porsche",
    "Jeep",
    "MG",
    "Suzuki",
    "Nissan",
    "Subaru",
    "Polestar",
    "Aston",
    "Dodge",
    "Jaguar",
    "Seat",
    "Cupra",
    "Land Rover",
    "Škoda",
    "Mitsubishi",
    "Mini",
    "Honda",
    "Lancia",
    "SsangYong",
    "Audi",
    "Ford",
    "Opel",
    "Toyota",
    "BMW",
    "Hyundai",
    "Peugeot",
    "Volkswagen",
    "Citroën",
    "Dacia",
    "Mazda",
    "Renault",
    "Volvo",
    "Fiat",
    "Mercedes-Benz",
    "Tesla",
];

pub const SLIM_BRANDS: &[&str] = &[
    "Alfa Romeo",
    "Land Rover",
    "Škoda",
    "Audi",
    "Ford",
    "Opel",
    "Toyota",
    "BMW",
    "Hyundai",
    "Peugeot",
    "Volkswagen",
    "Citroën",
    "Dacia",
    "Mazda",
    "Renault",
    "Volvo",
    "Fiat",
    "Mercedes-Benz",
    "Tesla",
];

/// Ordered brand labels matched as case-insensitive substrings of a listing
/// name. The first label that matches wins, so a multi-word brand has to come
/// before any label it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandTable {
    labels: Vec<String>,
    // 預先轉成小寫，避免每筆資料重算
    lowered: Vec<String>,
}

impl BrandTable {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let lowered = labels.iter().map(|label| label.to_lowercase()).collect();
        Self { labels, lowered }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Full => Self::new(FULL_BRANDS.iter().copied()),
            Variant::Slim => Self::new(SLIM_BRANDS.iter().copied()),
        }
    }

    pub fn detect(&self, name: &str) -> &str {
        let name = name.to_lowercase();
        self.lowered
            .iter()
            .position(|label| name.contains(label.as_str()))
            .map(|index| self.labels[index].as_str())
            .unwrap_or(UNKNOWN_BRAND)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for BrandTable {
    fn default() -> Self {
        Self::for_variant(Variant::Full)
    }
}
