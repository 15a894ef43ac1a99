use crate::domain::model::{ListingRecord, MergeStats, RecordStore};

/// Appends each new record whose id is not in the evolving store yet.
///
/// Duplicates (against the existing store or earlier records of the same
/// batch) are skipped and counted. Merging the same batch again is a no-op.
pub fn merge(
    mut store: RecordStore,
    records: impl IntoIterator<Item = ListingRecord>,
) -> (RecordStore, MergeStats) {
    let mut stats = MergeStats::default();

    for record in records {
        if store.contains(&record.id) {
            tracing::info!("🔁 Duplicate listing detected: {}, skipping", record.name);
            stats.duplicates += 1;
            continue;
        }
        store.insert(record);
        stats.appended += 1;
    }

    (store, stats)
}

/// 精簡模式：不去重，全部附加
pub fn append_all(
    mut store: RecordStore,
    records: impl IntoIterator<Item = ListingRecord>,
) -> (RecordStore, MergeStats) {
    let mut stats = MergeStats::default();
    for record in records {
        store.push_unchecked(record);
        stats.appended += 1;
    }
    (store, stats)
}
