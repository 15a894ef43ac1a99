use crate::domain::model::{ListingRecord, TransformResult, Variant};
use crate::domain::services::brands::BrandTable;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// Must replace the file whole or leave the previous content in place.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Response of a single GET as seen by the page fetcher.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Carries page requests to the listing site. Errors are transport failures
/// (connect, TLS, timeout) and abort the run; HTTP status codes are not errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse>;
}

pub trait ConfigProvider: Send + Sync {
    fn variant(&self) -> Variant;
    fn listing_url(&self) -> &str;
    fn page_param(&self) -> &str;
    fn pages(&self) -> u32;
    fn request_delay(&self) -> Duration;
    fn retry_attempts(&self) -> u32;
    fn retry_delay(&self) -> Duration;
    fn max_items_per_page(&self) -> usize;
    fn requires_info(&self) -> bool;
    fn brand_table(&self) -> BrandTable;
    fn output_path(&self) -> &str;
    fn snapshot_filename(&self) -> &str;
    fn report_filename(&self) -> &str;
    fn currency(&self) -> &str;

    // 傳輸層設定
    fn timeout(&self) -> Duration;
    fn proxy_url(&self) -> Option<&str>;
    fn accept_invalid_certs(&self) -> bool;
    fn headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ListingRecord>>;
    async fn transform(&self, data: Vec<ListingRecord>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
