use crate::domain::ports::Transport;
use crate::utils::error::{EtlError, Result};
use std::time::Duration;
use url::Url;

/// Outcome of fetching one listing page.
#[derive(Debug, Clone)]
pub enum PageFetch {
    Document(String),
    /// Non-success status; the page is skipped.
    Failed { status: u16 },
}

pub struct PageFetcher<T: Transport> {
    transport: T,
    listing_url: Url,
    page_param: String,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl<T: Transport> PageFetcher<T> {
    pub fn new(transport: T, listing_url: &str, page_param: impl Into<String>) -> Result<Self> {
        let listing_url = Url::parse(listing_url).map_err(|e| EtlError::InvalidConfigValueError {
            field: "listing_url".to_string(),
            value: listing_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        Ok(Self {
            transport,
            listing_url,
            page_param: page_param.into(),
            retry_attempts: 0,
            retry_delay: Duration::ZERO,
        })
    }

    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    pub fn page_url(&self, page: u32) -> String {
        let mut url = self.listing_url.clone();
        url.query_pairs_mut()
            .append_pair(&self.page_param, &page.to_string());
        url.to_string()
    }

    /// 非 2xx 狀態不算錯誤：回傳 `PageFetch::Failed` 由呼叫端略過該頁。
    /// 傳輸層錯誤才會往上拋。
    pub async fn fetch(&self, page: u32) -> Result<PageFetch> {
        let url = self.page_url(page);
        let mut attempt = 0;

        loop {
            tracing::debug!("Fetching page {} from {}", page, url);
            let response = self.transport.get(&url).await?;

            if response.is_success() {
                return Ok(PageFetch::Document(response.body));
            }

            if attempt >= self.retry_attempts {
                return Ok(PageFetch::Failed {
                    status: response.status,
                });
            }

            attempt += 1;
            tracing::debug!(
                "Page {} returned status {}, retry {}/{}",
                page,
                response.status,
                attempt,
                self.retry_attempts
            );
            if !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay).await;
            }
        }
    }
}
