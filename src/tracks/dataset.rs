//! Record collections with a lazily built region index

use crate::core::{GenomicIndex, Region};
use crate::formats::FeatureRecord;
use log::debug;
use once_cell::sync::OnceCell;

/// Owned records plus a region index built on first query
///
/// The index is never patched: any mutation drops it and the next query
/// rebuilds it from scratch.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    records: Vec<FeatureRecord>,
    index: OnceCell<GenomicIndex<usize>>,
}

impl FeatureSet {
    pub fn new(records: Vec<FeatureRecord>) -> Self {
        Self {
            records,
            index: OnceCell::new(),
        }
    }

    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<FeatureRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add a record, invalidating the index
    pub fn push(&mut self, record: FeatureRecord) {
        self.records.push(record);
        self.index.take();
    }

    /// Keep only records matching the predicate, invalidating the index
    pub fn retain<F: FnMut(&FeatureRecord) -> bool>(&mut self, f: F) {
        self.records.retain(f);
        self.index.take();
    }

    /// Whether the index has been built since the last mutation
    pub fn is_indexed(&self) -> bool {
        self.index.get().is_some()
    }

    /// Region index over the records (built on first access)
    pub fn index(&self) -> &GenomicIndex<usize> {
        self.index.get_or_init(|| {
            debug!("Building region index over {} records", self.records.len());
            GenomicIndex::build(
                self.records
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (r.chrom.as_str(), r.start, r.end, i)),
            )
        })
    }

    /// Records overlapping the region, in their original order
    pub fn search(&self, region: &Region) -> Vec<&FeatureRecord> {
        let mut hits: Vec<usize> = self
            .index()
            .search(&region.chrom, region.start, region.end)
            .into_iter()
            .copied()
            .collect();
        hits.sort_unstable();
        hits.into_iter().map(|i| &self.records[i]).collect()
    }
}

impl Extend<FeatureRecord> for FeatureSet {
    fn extend<I: IntoIterator<Item = FeatureRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
        self.index.take();
    }
}

impl FromIterator<FeatureRecord> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = FeatureRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
