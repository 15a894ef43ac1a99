use crate::domain::model::Price;

/// Stable listing id: hex MD5 of `name`, `kilometers` and the price text,
/// concatenated without separators. Ids in existing snapshots depend on this
/// exact layout.
pub fn listing_id(name: &str, kilometers: &str, price: &Price) -> String {
    let input = format!("{}{}{}", name, kilometers, price);
    format!("{:x}", md5::compute(input.as_bytes()))
}
