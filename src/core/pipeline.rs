use crate::adapters::http::ReqwestTransport;
use crate::core::extractor::ListingExtractor;
use crate::core::fetcher::{PageFetch, PageFetcher};
use crate::core::output::OutputWriter;
use crate::core::{ConfigProvider, ListingRecord, Pipeline, Storage, Transport, TransformResult};
use crate::domain::model::RecordStore;
use crate::domain::services::{aggregate, merge, merger::append_all, normalize, BrandTable};
use crate::utils::error::{EtlError, Result};
use scraper::Html;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
struct PageRecords {
    extracted: usize,
    skipped: usize,
}

/// Scrapes the listing pages, merges them into the persisted snapshot and
/// writes the snapshot plus the brand report.
pub struct ListingPipeline<S: Storage, C: ConfigProvider, T: Transport> {
    storage: S,
    config: C,
    fetcher: PageFetcher<T>,
    extractor: ListingExtractor,
    brands: BrandTable,
}

impl<S: Storage, C: ConfigProvider> ListingPipeline<S, C, ReqwestTransport> {
    pub fn from_config(storage: S, config: C) -> Result<Self> {
        let transport = ReqwestTransport::from_config(&config)?;
        Self::new(storage, config, transport)
    }
}

impl<S: Storage, C: ConfigProvider, T: Transport> ListingPipeline<S, C, T> {
    pub fn new(storage: S, config: C, transport: T) -> Result<Self> {
        let fetcher = PageFetcher::new(transport, config.listing_url(), config.page_param())?
            .with_retry(config.retry_attempts(), config.retry_delay());
        let extractor =
            ListingExtractor::new(config.max_items_per_page(), config.requires_info())?;
        let brands = config.brand_table();

        Ok(Self {
            storage,
            config,
            fetcher,
            extractor,
            brands,
        })
    }

    pub fn page_url(&self, page: u32) -> String {
        self.fetcher.page_url(page)
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// 解析單一頁面；`Html` 不是 `Send`，所以不能跨過 await
    fn records_from_page(
        &self,
        body: &str,
        page: u32,
        records: &mut Vec<ListingRecord>,
    ) -> PageRecords {
        let document = Html::parse_document(body);
        let mut counts = PageRecords::default();

        for fields in self.extractor.extract(&document, page) {
            match fields {
                Ok(raw) => {
                    records.push(normalize(&raw, &self.brands));
                    counts.extracted += 1;
                }
                Err(e) => {
                    tracing::warn!("⚠️ {}, skipping element", e);
                    counts.skipped += 1;
                }
            }
        }

        counts
    }

    /// Reads the previous snapshot. Missing or unreadable snapshots start an
    /// empty store.
    async fn load_existing(&self) -> RecordStore {
        let filename = self.config.snapshot_filename();

        let data = match self.storage.read_file(filename).await {
            Ok(data) => data,
            Err(EtlError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("📂 No snapshot at {}, starting with an empty store", filename);
                return RecordStore::new();
            }
            Err(e) => {
                tracing::warn!("⚠️ Could not read snapshot {}: {}", filename, e);
                return RecordStore::new();
            }
        };

        match serde_json::from_slice::<Vec<ListingRecord>>(&data) {
            Ok(records) => {
                let store = RecordStore::from_records(records);
                tracing::info!("📂 Loaded {} listings from {}", store.len(), filename);
                store
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ Snapshot {} is corrupt ({}), starting with an empty store",
                    filename,
                    e
                );
                RecordStore::new()
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, T: Transport> Pipeline for ListingPipeline<S, C, T> {
    async fn extract(&self) -> Result<Vec<ListingRecord>> {
        let pages = self.config.pages();
        let delay = self.config.request_delay();
        let mut records = Vec::new();
        let mut failed_pages = 0;
        let mut skipped_elements = 0;

        tracing::info!("🚀 Scraping {} pages from {}", pages, self.config.listing_url());

        for page in 1..=pages {
            if page > 1 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let body = match self.fetcher.fetch(page).await? {
                PageFetch::Document(body) => body,
                PageFetch::Failed { status } => {
                    tracing::warn!(
                        "⚠️ {}, skipping page",
                        EtlError::PageFetchError { page, status }
                    );
                    failed_pages += 1;
                    continue;
                }
            };

            let counts = self.records_from_page(&body, page, &mut records);
            skipped_elements += counts.skipped;
            tracing::debug!(
                "Page {}: {} listings, {} skipped",
                page,
                counts.extracted,
                counts.skipped
            );
        }

        tracing::info!(
            "📋 Extracted {} listings ({} pages failed, {} elements skipped)",
            records.len(),
            failed_pages,
            skipped_elements
        );
        Ok(records)
    }

    async fn transform(&self, data: Vec<ListingRecord>) -> Result<TransformResult> {
        let variant = self.config.variant();

        let existing = if variant.persists_snapshot() {
            self.load_existing().await
        } else {
            RecordStore::new()
        };

        let (store, stats) = if variant.deduplicates() {
            merge(existing, data)
        } else {
            append_all(existing, data)
        };

        tracing::info!(
            "🔗 Merged: {} new, {} duplicates, {} total",
            stats.appended,
            stats.duplicates,
            store.len()
        );

        let groups = aggregate(store.records());
        Ok(TransformResult {
            store,
            stats,
            groups,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let variant = self.config.variant();
        let writer = OutputWriter::new(
            &self.storage,
            self.config.snapshot_filename(),
            self.config.report_filename(),
        );

        if variant.persists_snapshot() {
            writer.write_snapshot(result.store.records()).await?;
        }
        writer
            .write_report(&result.groups, self.config.currency(), variant)
            .await?;

        let report_path = Path::new(self.config.output_path()).join(self.config.report_filename());
        Ok(report_path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extractor::fixtures::{listing_item, listing_page};
    use crate::domain::model::{Price, Variant};
    use crate::domain::ports::TransportResponse;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put(&self, path: &str, data: &[u8]) {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
        }

        async fn get_text(&self, path: &str) -> Option<String> {
            let files = self.files.lock().await;
            files
                .get(path)
                .map(|data| String::from_utf8_lossy(data).into_owned())
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    /// 以頁碼回傳固定 HTML；沒有設定的頁面回 404
    struct MockTransport {
        pages: HashMap<String, String>,
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get(&self, url: &str) -> Result<TransportResponse> {
            let page = url.rsplit('=').next().unwrap_or_default();
            Ok(match self.pages.get(page) {
                Some(body) => TransportResponse {
                    status: 200,
                    body: body.clone(),
                },
                None => TransportResponse {
                    status: 404,
                    body: String::new(),
                },
            })
        }
    }

    struct MockConfig {
        pages: u32,
        variant: Variant,
    }

    impl ConfigProvider for MockConfig {
        fn variant(&self) -> Variant {
            self.variant
        }
        fn listing_url(&self) -> &str {
            "http://listings.test/osobni/"
        }
        fn page_param(&self) -> &str {
            "strana"
        }
        fn pages(&self) -> u32 {
            self.pages
        }
        fn request_delay(&self) -> Duration {
            Duration::ZERO
        }
        fn retry_attempts(&self) -> u32 {
            0
        }
        fn retry_delay(&self) -> Duration {
            Duration::ZERO
        }
        fn max_items_per_page(&self) -> usize {
            self.variant.default_max_items()
        }
        fn requires_info(&self) -> bool {
            self.variant.requires_info()
        }
        fn brand_table(&self) -> BrandTable {
            BrandTable::for_variant(self.variant)
        }
        fn output_path(&self) -> &str {
            "out"
        }
        fn snapshot_filename(&self) -> &str {
            "scraped_cars.json"
        }
        fn report_filename(&self) -> &str {
            "sorted_cars.txt"
        }
        fn currency(&self) -> &str {
            "Kč"
        }
        fn timeout(&self) -> Duration {
            Duration::from_secs(5)
        }
        fn proxy_url(&self) -> Option<&str> {
            None
        }
        fn accept_invalid_certs(&self) -> bool {
            false
        }
    }

    fn pipeline(
        storage: MockStorage,
        pages: &[(u32, String)],
        page_count: u32,
        variant: Variant,
    ) -> ListingPipeline<MockStorage, MockConfig, MockTransport> {
        let transport = MockTransport {
            pages: pages
                .iter()
                .map(|(page, body)| (page.to_string(), body.clone()))
                .collect(),
        };
        let config = MockConfig {
            pages: page_count,
            variant,
        };
        ListingPipeline::new(storage, config, transport).unwrap()
    }

    fn octavia() -> String {
        listing_item(
            "Škoda Octavia",
            "2.0 TDI, Style",
            "349&nbsp;900&nbsp;Kč",
            Some("2019, 120&nbsp;000&nbsp;km"),
        )
    }

    #[tokio::test]
    async fn test_failed_and_empty_pages_do_not_stop_the_run() {
        let pages = vec![
            (1, "<html><body>maintenance</body></html>".to_string()),
            (3, listing_page(&[octavia()])),
        ];
        let pipeline = pipeline(MockStorage::new(), &pages, 3, Variant::Full);

        let records = pipeline.extract().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].brand, "Škoda");
        assert_eq!(records[0].price, Price::Amount(349900));
    }

    #[tokio::test]
    async fn test_duplicates_across_pages_collapse() {
        let pages = vec![
            (1, listing_page(&[octavia()])),
            (2, listing_page(&[octavia()])),
        ];
        let pipeline = pipeline(MockStorage::new(), &pages, 2, Variant::Full);

        let records = pipeline.extract().await.unwrap();
        assert_eq!(records.len(), 2);

        let result = pipeline.transform(records).await.unwrap();
        assert_eq!(result.store.len(), 1);
        assert_eq!(result.stats.duplicates, 1);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_starts_empty() {
        let storage = MockStorage::new();
        storage.put("scraped_cars.json", b"{ not json").await;
        let pipeline = pipeline(storage, &[], 1, Variant::Full);

        let result = pipeline.transform(Vec::new()).await.unwrap();
        assert!(result.store.is_empty());
        assert!(result.groups.is_empty());
    }

    #[tokio::test]
    async fn test_empty_run_writes_empty_outputs() {
        let storage = MockStorage::new();
        let pipeline = pipeline(storage.clone(), &[], 2, Variant::Full);

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();
        let report_path = pipeline.load(result).await.unwrap();

        assert!(report_path.ends_with("sorted_cars.txt"));
        assert_eq!(storage.get_text("sorted_cars.txt").await.as_deref(), Some(""));
        assert_eq!(storage.get_text("scraped_cars.json").await.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_existing_snapshot_is_extended() {
        let storage = MockStorage::new();
        let first = pipeline(
            storage.clone(),
            &[(1, listing_page(&[octavia()]))],
            1,
            Variant::Full,
        );
        let records = first.extract().await.unwrap();
        let result = first.transform(records).await.unwrap();
        first.load(result).await.unwrap();

        let fabia = listing_item("Škoda Fabia", "1.0 TSI", "150 000 Kč", Some("2021, 30 000 km"));
        let second = pipeline(
            storage.clone(),
            &[(1, listing_page(&[octavia(), fabia]))],
            1,
            Variant::Full,
        );
        let records = second.extract().await.unwrap();
        let result = second.transform(records).await.unwrap();
        assert_eq!(result.stats.appended, 1);
        assert_eq!(result.stats.duplicates, 1);
        second.load(result).await.unwrap();

        let snapshot = storage.get_text("scraped_cars.json").await.unwrap();
        let stored: Vec<ListingRecord> = serde_json::from_str(&snapshot).unwrap();
        let names: Vec<&str> = stored.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Škoda Octavia", "Škoda Fabia"]);
        // "150 000 Kč" 使用一般空白，無法解析
        assert_eq!(stored[1].price, Price::Unparseable);
    }

    #[tokio::test]
    async fn test_slim_variant_skips_snapshot_and_dedup() {
        let storage = MockStorage::new();
        let item = listing_item("Audi A4, Avant", "2.0 TDI", "500&nbsp;000&nbsp;Kč", None);
        let pipeline = pipeline(
            storage.clone(),
            &[(1, listing_page(&[item.clone(), item]))],
            1,
            Variant::Slim,
        );

        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();
        assert_eq!(result.store.len(), 2);
        pipeline.load(result).await.unwrap();

        assert!(storage.get_text("scraped_cars.json").await.is_none());
        let report = storage.get_text("sorted_cars.txt").await.unwrap();
        assert_eq!(
            report,
            "Brand: Audi\n\
- Name: Audi A4, Price: 500000 Kč, Detail: Avant\n\
- Name: Audi A4, Price: 500000 Kč, Detail: Avant\n\n"
        );
    }
}
