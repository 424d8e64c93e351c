//! Interval indices for efficient overlap queries
//!
//! `GenomicIndex` uses rust-lapper for O(log n + k) queries per chromosome.
//! `SpanIndex` tracks the occupied spans of a single layout level.

use rust_lapper::{Interval, Lapper};
use std::collections::{BTreeMap, HashMap};

/// Type alias for stored genomic intervals
pub type GenomicInterval<T> = Interval<u64, T>;

/// Interval index organized by category (chromosome)
///
/// Spans are half-open. Zero-length spans are stored and queried as the
/// single position `[p, p + 1)`.
#[derive(Debug, Clone)]
pub struct GenomicIndex<T>
where
    T: Eq + Clone + Send + Sync,
{
    /// Category -> interval tree (using Lapper)
    maps: HashMap<String, Lapper<u64, T>>,
    /// Normalized chromosome name mapping (lowercase, no "chr" -> original)
    chrom_aliases: HashMap<String, String>,
}

impl<T> Default for GenomicIndex<T>
where
    T: Eq + Clone + Send + Sync,
{
    fn default() -> Self {
        Self {
            maps: HashMap::new(),
            chrom_aliases: HashMap::new(),
        }
    }
}

impl<T> GenomicIndex<T>
where
    T: Eq + Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Build index from `(category, start, end, payload)` tuples
    ///
    /// Tuples do not need to be sorted; they are grouped by category first.
    pub fn build<S, I>(intervals: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, u64, u64, T)>,
    {
        let mut by_chrom: HashMap<String, Vec<GenomicInterval<T>>> = HashMap::new();

        for (chrom, start, end, val) in intervals {
            by_chrom
                .entry(chrom.into())
                .or_default()
                .push(stored_interval(start, end, val));
        }

        let mut maps = HashMap::with_capacity(by_chrom.len());
        let mut chrom_aliases = HashMap::with_capacity(by_chrom.len());

        for (chrom, intervals) in by_chrom {
            chrom_aliases.insert(normalize_chrom_key(&chrom), chrom.clone());
            maps.insert(chrom, Lapper::new(intervals));
        }

        Self { maps, chrom_aliases }
    }

    /// Add a single interval
    pub fn insert(&mut self, chrom: &str, start: u64, end: u64, val: T) {
        if !self.maps.contains_key(chrom) {
            self.chrom_aliases
                .insert(normalize_chrom_key(chrom), chrom.to_string());
        }
        self.maps
            .entry(chrom.to_string())
            .or_insert_with(|| Lapper::new(vec![]))
            .insert(stored_interval(start, end, val));
    }

    /// Query payloads of intervals overlapping `[begin, end)`, ordered by start
    ///
    /// An unknown chromosome yields an empty result.
    pub fn search(&self, chrom: &str, begin: u64, end: u64) -> Vec<&T> {
        self.search_intervals(chrom, begin, end)
            .into_iter()
            .map(|iv| &iv.val)
            .collect()
    }

    /// Query intervals and return full Interval structs
    pub fn search_intervals(&self, chrom: &str, begin: u64, end: u64) -> Vec<&GenomicInterval<T>> {
        let (begin, end) = query_span(begin, end);
        match self.find_lapper(chrom) {
            Some(l) => l.find(begin, end).collect(),
            None => vec![],
        }
    }

    /// Check whether any stored interval overlaps `[begin, end)`
    pub fn overlaps(&self, chrom: &str, begin: u64, end: u64) -> bool {
        let (begin, end) = query_span(begin, end);
        self.find_lapper(chrom)
            .map(|l| l.find(begin, end).next().is_some())
            .unwrap_or(false)
    }

    /// Find the Lapper for a chromosome, trying different naming styles
    fn find_lapper(&self, chrom: &str) -> Option<&Lapper<u64, T>> {
        if let Some(l) = self.maps.get(chrom) {
            return Some(l);
        }

        let normalized = normalize_chrom_key(chrom);
        self.chrom_aliases
            .get(&normalized)
            .and_then(|original| self.maps.get(original))
    }

    /// Check if a chromosome exists in the index
    pub fn has_chrom(&self, chrom: &str) -> bool {
        self.find_lapper(chrom).is_some()
    }

    /// Get all chromosome names
    pub fn chroms(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(|s| s.as_str())
    }

    /// Get the number of intervals for a chromosome
    pub fn interval_count(&self, chrom: &str) -> usize {
        self.find_lapper(chrom).map(|l| l.len()).unwrap_or(0)
    }

    /// Get total number of intervals across all chromosomes
    pub fn len(&self) -> usize {
        self.maps.values().map(|l| l.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[inline]
fn stored_interval<T: Eq + Clone + Send + Sync>(start: u64, end: u64, val: T) -> GenomicInterval<T> {
    let (start, stop) = query_span(start, end);
    Interval { start, stop, val }
}

#[inline]
fn query_span(begin: u64, end: u64) -> (u64, u64) {
    if begin == end {
        (begin, begin.saturating_add(1))
    } else {
        (begin, end)
    }
}

/// Normalize chromosome name for flexible matching
///
/// Converts to lowercase and removes the "chr" prefix.
fn normalize_chrom_key(chrom: &str) -> String {
    let lower = chrom.to_lowercase();
    match lower.strip_prefix("chr") {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

/// Occupied spans of one layout level
///
/// Members of a level never overlap, so the spans are disjoint and sorted
/// both by start and by end. Overlap tests and insertion are O(log n).
#[derive(Debug, Clone, Default)]
pub struct SpanIndex {
    /// start -> end of each occupied span (zero-length spans widened)
    spans: BTreeMap<i64, i64>,
}

impl SpanIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `[begin, end)` overlaps an occupied span
    pub fn overlaps(&self, begin: i64, end: i64) -> bool {
        let (begin, end) = crate::core::point_span(begin, end);
        // The span starting last before `end` also ends last.
        self.spans
            .range(..end)
            .next_back()
            .map(|(_, &stop)| stop > begin)
            .unwrap_or(false)
    }

    /// Mark `[begin, end)` as occupied
    ///
    /// Callers must check `overlaps` first.
    pub fn insert(&mut self, begin: i64, end: i64) {
        debug_assert!(!self.overlaps(begin, end));
        let (begin, end) = crate::core::point_span(begin, end);
        self.spans.insert(begin, end);
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Occupied spans in genomic order
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.spans.iter().map(|(&start, &end)| (start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_index() -> GenomicIndex<usize> {
        GenomicIndex::build(vec![
            ("chr1", 100, 200, 0),
            ("chr2", 0, 100, 1),
            ("chr1", 250, 300, 2),
            ("chr1", 150, 260, 3),
            ("chr2", 150, 200, 4),
        ])
    }

    #[test]
    fn test_index_creation() {
        let index = create_test_index();

        assert!(index.has_chrom("chr1"));
        assert!(index.has_chrom("chr2"));
        assert!(!index.has_chrom("chr3"));

        assert_eq!(index.len(), 5);
        assert_eq!(index.interval_count("chr1"), 3);
        assert_eq!(index.interval_count("chr3"), 0);
    }

    #[test]
    fn test_search_basic() {
        let index = create_test_index();

        let results = index.search("chr1", 110, 120);
        assert_eq!(results, vec![&0]);
    }

    #[test]
    fn test_search_multiple_overlaps() {
        let index = create_test_index();

        let mut results: Vec<usize> = index.search("chr1", 190, 255).into_iter().copied().collect();
        results.sort();
        assert_eq!(results, vec![0, 2, 3]);
    }

    #[test]
    fn test_search_half_open_boundaries() {
        let index = create_test_index();

        // [100, 200) touches the query end at 100 and the query start at 200
        assert!(index.search("chr1", 50, 100).is_empty());
        let results = index.search("chr1", 300, 400);
        assert!(results.is_empty());
        assert_eq!(index.search("chr1", 99, 101), vec![&0]);
    }

    #[test]
    fn test_search_unknown_chrom_is_empty() {
        let index = create_test_index();
        assert!(index.search("chr3", 0, 1000).is_empty());
        assert!(!index.overlaps("chr3", 0, 1000));
    }

    #[test]
    fn test_chrom_name_variants() {
        let index = create_test_index();

        assert!(index.has_chrom("1"));
        assert!(index.has_chrom("CHR1"));
        assert_eq!(index.search("1", 110, 120).len(), 1);
    }

    #[test]
    fn test_zero_length_intervals() {
        let index = GenomicIndex::build(vec![("chr1", 50u64, 50u64, 'a')]);

        assert_eq!(index.search("chr1", 50, 51), vec![&'a']);
        assert_eq!(index.search("chr1", 50, 50), vec![&'a']);
        assert!(index.search("chr1", 40, 50).is_empty());
        assert!(index.search("chr1", 51, 60).is_empty());
    }

    #[test]
    fn test_insert_grows_index() {
        let mut index = create_test_index();
        index.insert("chr3", 10, 20, 9);
        index.insert("chr1", 500, 600, 10);

        assert!(index.has_chrom("chr3"));
        assert!(index.has_chrom("3"));
        assert_eq!(index.search("chr3", 0, 15), vec![&9]);
        assert!(index.overlaps("chr1", 550, 551));
        assert_eq!(index.len(), 7);
    }

    #[test]
    fn test_span_index_overlaps() {
        let mut spans = SpanIndex::new();
        spans.insert(10, 20);
        spans.insert(30, 40);

        assert!(!spans.overlaps(20, 30));
        assert!(!spans.overlaps(0, 10));
        assert!(!spans.overlaps(40, 50));
        assert!(spans.overlaps(19, 30));
        assert!(spans.overlaps(0, 100));
        assert!(spans.overlaps(35, 36));
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn test_span_index_points() {
        let mut spans = SpanIndex::new();
        spans.insert(10, 10);

        assert!(spans.overlaps(10, 10));
        assert!(spans.overlaps(5, 11));
        assert!(!spans.overlaps(5, 10));
        assert!(!spans.overlaps(11, 20));
        assert_eq!(spans.iter().collect::<Vec<_>>(), vec![(10, 11)]);
    }
}
