pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, ReqwestTransport};
pub use config::toml_config::TomlConfig;
pub use core::{etl::EtlEngine, pipeline::ListingPipeline};
pub use domain::model::{ListingRecord, Price, RecordStore, Variant};
pub use utils::error::{EtlError, Result};
