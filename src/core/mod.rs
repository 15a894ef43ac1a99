pub mod etl;
pub mod extractor;
pub mod fetcher;
pub mod output;
pub mod pipeline;

pub use crate::domain::model::{ListingRecord, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, Transport};
pub use crate::utils::error::Result;
