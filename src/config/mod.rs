pub mod toml_config;

use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::Variant;
#[cfg(feature = "cli")]
use crate::domain::services::BrandTable;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_brand_labels, validate_non_empty_string, validate_path, validate_positive_number,
    validate_proxy_url, validate_range, validate_url,
};
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

pub const DEFAULT_LISTING_URL: &str = "https://www.sauto.cz/inzerce/osobni/";
pub const DEFAULT_PAGE_PARAM: &str = "strana";
pub const DEFAULT_SNAPSHOT_FILENAME: &str = "scraped_cars.json";
pub const DEFAULT_REPORT_FILENAME: &str = "sorted_cars.txt";
pub const DEFAULT_CURRENCY: &str = "Kč";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// 網站最多提供 500 頁
pub const MAX_PAGES: u32 = 500;

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_url("listing_url", config.listing_url())?;
    validate_non_empty_string("page_param", config.page_param())?;
    validate_range("pages", config.pages(), 1, MAX_PAGES)?;
    validate_positive_number("max_items_per_page", config.max_items_per_page(), 1)?;
    validate_path("output_path", config.output_path())?;
    validate_non_empty_string("snapshot_filename", config.snapshot_filename())?;
    validate_non_empty_string("report_filename", config.report_filename())?;
    validate_brand_labels("brands", config.brand_table().labels())?;

    if let Some(proxy_url) = config.proxy_url() {
        validate_proxy_url("proxy_url", proxy_url)?;
    }

    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "sauto-etl")]
#[command(about = "Scrapes car listings into a deduplicated snapshot and a per-brand price report")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_LISTING_URL)]
    pub listing_url: String,

    #[arg(long, default_value = DEFAULT_PAGE_PARAM)]
    pub page_param: String,

    #[arg(long, default_value_t = MAX_PAGES, help = "Number of listing pages to scan (max 500)")]
    pub pages: u32,

    #[arg(long, default_value = ".")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_SNAPSHOT_FILENAME)]
    pub snapshot_filename: String,

    #[arg(long, default_value = DEFAULT_REPORT_FILENAME)]
    pub report_filename: String,

    #[arg(long, value_enum, default_value_t = Variant::Full)]
    pub variant: Variant,

    #[arg(long, help = "Listings read per page (defaults to 17, or 6 for slim)")]
    pub max_items: Option<usize>,

    #[arg(long, value_delimiter = ',', help = "Ordered brand list overriding the built-in table")]
    pub brands: Vec<String>,

    #[arg(long, default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    #[arg(long, default_value = "0", help = "Pause between page requests")]
    pub request_delay_ms: u64,

    #[arg(long, default_value = "0")]
    pub retry_attempts: u32,

    #[arg(long, default_value = "1000")]
    pub retry_delay_ms: u64,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, help = "Proxy URL every request is routed through")]
    pub proxy_url: Option<String>,

    #[arg(long, help = "Skip TLS certificate verification")]
    pub accept_invalid_certs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn variant(&self) -> Variant {
        self.variant
    }

    fn listing_url(&self) -> &str {
        &self.listing_url
    }

    fn page_param(&self) -> &str {
        &self.page_param
    }

    fn pages(&self) -> u32 {
        self.pages
    }

    fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    fn max_items_per_page(&self) -> usize {
        self.max_items
            .unwrap_or_else(|| self.variant.default_max_items())
    }

    fn requires_info(&self) -> bool {
        self.variant.requires_info()
    }

    fn brand_table(&self) -> BrandTable {
        if self.brands.is_empty() {
            BrandTable::for_variant(self.variant)
        } else {
            BrandTable::new(self.brands.iter().map(|brand| brand.trim()))
        }
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn snapshot_filename(&self) -> &str {
        &self.snapshot_filename
    }

    fn report_filename(&self) -> &str {
        &self.report_filename
    }

    fn currency(&self) -> &str {
        &self.currency
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn proxy_url(&self) -> Option<&str> {
        self.proxy_url.as_deref()
    }

    fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
