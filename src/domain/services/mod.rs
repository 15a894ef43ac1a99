pub mod aggregator;
pub mod brands;
pub mod identity;
pub mod merger;
pub mod normalizer;

pub use aggregator::aggregate;
pub use brands::BrandTable;
pub use identity::listing_id;
pub use merger::merge;
pub use normalizer::normalize;
