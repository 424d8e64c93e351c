//! Merging of overlapping intervals
//!
//! Used to collapse exon spans into a transcript or gene body.

/// Lazy iterator over merged `(low, high)` runs
///
/// Created by [`merge_intervals`].
#[derive(Debug, Clone)]
pub struct MergeIntervals<T> {
    sorted: std::vec::IntoIter<(T, T)>,
    current: Option<(T, T)>,
}

impl<T: Ord + Copy> Iterator for MergeIntervals<T> {
    type Item = (T, T);

    fn next(&mut self) -> Option<(T, T)> {
        let (low, mut high) = self.current.take()?;

        for (start, end) in self.sorted.by_ref() {
            if start <= high {
                high = high.max(end);
            } else {
                self.current = Some((start, end));
                return Some((low, high));
            }
        }

        Some((low, high))
    }
}

/// Merge overlapping (and touching) intervals
///
/// Input may be unsorted. Intervals whose start is `<=` the end of the
/// current run join it; a start past the run's end begins a new run.
///
/// # Examples
/// ```
/// use fast_geneviz::core::merge_intervals;
///
/// let merged: Vec<_> = merge_intervals(vec![(10, 20), (30, 40), (15, 25)]).collect();
/// assert_eq!(merged, vec![(10, 25), (30, 40)]);
/// ```
pub fn merge_intervals<T, I>(pairs: I) -> MergeIntervals<T>
where
    T: Ord + Copy,
    I: IntoIterator<Item = (T, T)>,
{
    let mut pairs: Vec<(T, T)> = pairs.into_iter().collect();
    pairs.sort_by_key(|&(start, _)| start);

    let mut sorted = pairs.into_iter();
    let current = sorted.next();

    MergeIntervals { sorted, current }
}
