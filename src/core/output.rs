use crate::domain::model::{BrandGroup, ListingRecord, Variant};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::Serialize;

/// 快照使用四格縮排，非 ASCII 字元原樣輸出
pub fn render_snapshot(records: &[ListingRecord]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    records.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Renders the grouped listings as the plain-text report.
///
/// Each brand block is a `Brand:` header, one line per listing and a blank
/// line. No groups gives an empty report.
pub fn render_report(groups: &[BrandGroup], currency: &str, variant: Variant) -> String {
    let mut report = String::new();

    for group in groups {
        report.push_str(&format!("Brand: {}\n", group.brand));
        for record in &group.records {
            let line = match variant {
                Variant::Full => format!(
                    "- ID: {}, Name: {}, Price: {} {}, KM Driven: {}, Year: {}\n",
                    record.id, record.name, record.price, currency, record.kilometers, record.age
                ),
                Variant::Slim => format!(
                    "- Name: {}, Price: {} {}, Detail: {}\n",
                    record.name, record.price, currency, record.detail
                ),
            };
            report.push_str(&line);
        }
        report.push('\n');
    }

    report
}

pub struct OutputWriter<'a, S: Storage> {
    storage: &'a S,
    snapshot_filename: &'a str,
    report_filename: &'a str,
}

impl<'a, S: Storage> OutputWriter<'a, S> {
    pub fn new(storage: &'a S, snapshot_filename: &'a str, report_filename: &'a str) -> Self {
        Self {
            storage,
            snapshot_filename,
            report_filename,
        }
    }

    pub async fn write_snapshot(&self, records: &[ListingRecord]) -> Result<()> {
        let data = render_snapshot(records)?;
        tracing::debug!(
            "Writing snapshot of {} listings ({} bytes) to {}",
            records.len(),
            data.len(),
            self.snapshot_filename
        );
        self.storage.write_file(self.snapshot_filename, &data).await
    }

    pub async fn write_report(
        &self,
        groups: &[BrandGroup],
        currency: &str,
        variant: Variant,
    ) -> Result<()> {
        let report = render_report(groups, currency, variant);
        tracing::debug!(
            "Writing report with {} brand blocks to {}",
            groups.len(),
            self.report_filename
        );
        self.storage
            .write_file(self.report_filename, report.as_bytes())
            .await
    }
}
