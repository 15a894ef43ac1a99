//! Turns the raw text of a listing element into a [`ListingRecord`].
//!
//! Every function here is pure. The splitting helpers document what they do
//! with zero-comma and malformed input, since the site does not guarantee
//! either shape.

use crate::domain::model::{ListingRecord, Price, RawFields};
use crate::domain::services::brands::BrandTable;
use crate::domain::services::identity::listing_id;

const CURRENCY_MARKER: &str = "Kč";
const NON_BREAKING_SPACE: char = '\u{a0}';
const THOUSANDS_SEPARATOR: char = ',';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelParts {
    pub detail: String,
    /// Everything after the first comma, empty when there is none.
    pub descriptor: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub name: String,
    /// Second comma-separated part of the name, if present.
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoParts {
    pub age: String,
    pub kilometers: String,
}

fn strip_non_breaking(text: &str) -> String {
    text.chars()
        .filter(|c| *c != NON_BREAKING_SPACE)
        .collect()
}

/// Parses price text such as `"189 000 Kč"` (with no-break spaces).
///
/// Removes the currency marker, U+00A0 no-break spaces and commas, then reads what is
/// left as a non-negative base-10 integer. Anything else, including empty
/// text, is [`Price::Unparseable`].
pub fn parse_price(text: &str) -> Price {
    let cleaned: String = strip_non_breaking(&text.replace(CURRENCY_MARKER, ""))
        .chars()
        .filter(|c| *c != THOUSANDS_SEPARATOR)
        .collect();

    cleaned
        .trim()
        .parse::<u64>()
        .map(Price::Amount)
        .unwrap_or(Price::Unparseable)
}

/// Splits the name suffix on its first comma.
///
/// `"1.6 TDI, Style"` gives detail `"1.6 TDI"` and descriptor `"Style"`.
/// Without a comma the whole (trimmed) text is the detail.
pub fn split_model(model: &str) -> ModelParts {
    match model.split_once(',') {
        Some((detail, descriptor)) => ModelParts {
            detail: detail.trim().to_string(),
            descriptor: descriptor.trim().to_string(),
        },
        None => ModelParts {
            detail: model.trim().to_string(),
            descriptor: String::new(),
        },
    }
}

/// Splits the full listing name on commas.
///
/// Part 0 is the name; part 1, when present, is a model string. Parts after
/// the second are dropped.
pub fn split_name(full_name: &str) -> NameParts {
    let mut parts = full_name.split(',');
    let name = parts.next().unwrap_or_default().trim().to_string();
    let model = parts.next().map(|part| part.trim().to_string());
    NameParts { name, model }
}

/// Splits the info line (`"2019, 120 000 km"`) into age and kilometers.
///
/// Part 0 is the age, part 1 (no-break spaces removed) the kilometers; later
/// parts are ignored. With no comma the kilometers are empty. Missing info
/// leaves both empty.
pub fn split_info(info: Option<&str>) -> InfoParts {
    let Some(info) = info else {
        return InfoParts {
            age: String::new(),
            kilometers: String::new(),
        };
    };

    let mut parts = info.split(',');
    let age = parts.next().unwrap_or_default().trim().to_string();
    let kilometers = parts
        .next()
        .map(|part| strip_non_breaking(part).trim().to_string())
        .unwrap_or_default();

    InfoParts { age, kilometers }
}

pub fn normalize(raw: &RawFields, brands: &BrandTable) -> ListingRecord {
    let brand = brands.detect(&raw.name).to_string();
    let price = parse_price(&raw.price);
    let info = split_info(raw.info.as_deref());

    // 名稱中的第二段優先於 suffix 的 detail
    let NameParts { name, model } = split_name(&raw.name);
    let detail = model.unwrap_or_else(|| split_model(&raw.model).detail);

    ListingRecord {
        id: listing_id(&name, &info.kilometers, &price),
        brand,
        name,
        detail,
        price,
        age: info.age,
        kilometers: info.kilometers,
    }
}
