//! Streaming rank bound (s-bound) computation
//!
//! The rank bound of a dataset is the largest `s` such that the dataset holds
//! at least `s` pairwise-distinct records with item-length `>= s`, i.e. the
//! h-index of the distinct record lengths. It upper-bounds the empirical
//! VC-dimension of the sequential-pattern range space on that dataset.
//!
//! The tracker keeps at most `rank_bound` records in memory, sorted by
//! item-length descending. A record only enters the working set when it is
//! longer than the current bound, so the work per record is bounded by the
//! final rank bound and not by the dataset size.

use crate::error::Result;
use crate::record::{item_length, open_dataset};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

/// Record tracked by the working set together with its item-length
#[derive(Debug, Clone)]
struct RankEntry {
    record: String,
    length: usize,
}

/// Final product of a rank bound pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundResult {
    /// h-index of the distinct record lengths
    pub rank_bound: u64,
    /// Number of records read, duplicates included
    pub dataset_size: u64,
}

/// Single-pass rank bound tracker
///
/// # Example
/// ```
/// use seqbound::rank_bound::RankBoundTracker;
///
/// let mut tracker = RankBoundTracker::new();
/// for record in ["1 2 3 -1 -2", "4 5 -1 -2", "6 -1 7 -1 -2"] {
///     tracker.observe(record).unwrap();
/// }
/// let result = tracker.finalize();
/// assert_eq!(result.rank_bound, 2);
/// assert_eq!(result.dataset_size, 3);
/// ```
#[derive(Debug, Default)]
pub struct RankBoundTracker {
    rank_bound: u64,
    records_seen: u64,
    /// Sorted by length descending; latest insert first among equal lengths
    working_set: Vec<RankEntry>,
    membership: HashSet<String>,
}

impl RankBoundTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the next record of the stream
    ///
    /// Records must be observed once each, in file order. A malformed record
    /// fails the pass.
    pub fn observe(&mut self, record: &str) -> Result<()> {
        self.records_seen += 1;

        if self.membership.contains(record) {
            return Ok(());
        }

        let length = item_length(record, self.records_seen)?;
        if length as u64 <= self.rank_bound {
            return Ok(());
        }

        let position = self.working_set.partition_point(|e| e.length > length);
        self.working_set.insert(
            position,
            RankEntry {
                record: record.to_string(),
                length,
            },
        );
        self.membership.insert(record.to_string());

        // working_set now holds rank_bound + 1 entries
        let weakest = self
            .working_set
            .last()
            .map_or(0, |entry| entry.length as u64);

        if weakest > self.rank_bound {
            self.rank_bound += 1;
            tracing::trace!(
                rank_bound = self.rank_bound,
                line = self.records_seen,
                "rank bound grew"
            );
        } else if let Some(evicted) = self.working_set.pop() {
            self.membership.remove(&evicted.record);
        }

        Ok(())
    }

    /// Current rank bound
    pub fn rank_bound(&self) -> u64 {
        self.rank_bound
    }

    /// Records observed so far, duplicates included
    pub fn records_seen(&self) -> u64 {
        self.records_seen
    }

    /// Number of records currently held in the working set
    pub fn working_set_len(&self) -> usize {
        self.working_set.len()
    }

    /// Item-lengths of the working set, longest first
    pub fn tracked_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.working_set.iter().map(|e| e.length)
    }

    /// End the pass and release the working set
    pub fn finalize(self) -> BoundResult {
        BoundResult {
            rank_bound: self.rank_bound,
            dataset_size: self.records_seen,
        }
    }

    /// Run a full pass over a line-oriented reader
    pub fn scan<R: BufRead>(reader: R) -> Result<BoundResult> {
        let mut tracker = Self::new();
        for line in reader.lines() {
            tracker.observe(&line?)?;
        }
        Ok(tracker.finalize())
    }
}

/// Compute the rank bound and record count of a dataset file
pub fn compute_rank_bound(dataset: &Path) -> Result<BoundResult> {
    tracing::debug!(dataset = %dataset.display(), "starting rank bound pass");
    let result = RankBoundTracker::scan(open_dataset(dataset)?)?;
    tracing::debug!(
        rank_bound = result.rank_bound,
        dataset_size = result.dataset_size,
        "rank bound pass complete"
    );
    Ok(result)
}

/// Brute-force h-index of a list of lengths
///
/// Sorts descending and returns the largest `s` with the `s`-th value `>= s`.
/// Used to cross-check the streaming tracker.
pub fn h_index(lengths: &[usize]) -> u64 {
    let mut sorted = lengths.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted
        .iter()
        .enumerate()
        .take_while(|(i, len)| **len > *i)
        .count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Build a distinct record of the given item-length
    fn record(id: usize, length: usize) -> String {
        if length == 0 {
            return "-1 -2".to_string();
        }
        let mut items = vec![format!("{}", 1000 + id)];
        items.extend((1..length).map(|i| i.to_string()));
        format!("{} -1 -2", items.join(" "))
    }

    #[test]
    fn test_empty_stream() {
        let tracker = RankBoundTracker::new();
        let result = tracker.finalize();
        assert_eq!(result.rank_bound, 0);
        assert_eq!(result.dataset_size, 0);
    }

    #[test]
    fn test_example_lengths() {
        let mut tracker = RankBoundTracker::new();
        for (id, len) in [5, 3, 3, 2, 1].into_iter().enumerate() {
            tracker.observe(&record(id, len)).unwrap();
        }
        assert_eq!(tracker.rank_bound(), 3);
        assert_eq!(tracker.working_set_len(), 3);
        assert_eq!(tracker.finalize().dataset_size, 5);
    }

    #[test]
    fn test_duplicates_counted_but_not_tracked() {
        let mut tracker = RankBoundTracker::new();
        let r = record(0, 4);
        for _ in 0..4 {
            tracker.observe(&r).unwrap();
        }
        // One distinct record of length 4 only supports s = 1
        assert_eq!(tracker.rank_bound(), 1);
        assert_eq!(tracker.records_seen(), 4);
    }

    #[test]
    fn test_short_records_skipped() {
        let mut tracker = RankBoundTracker::new();
        for id in 0..3 {
            tracker.observe(&record(id, 10)).unwrap();
        }
        assert_eq!(tracker.rank_bound(), 3);
        for id in 3..20 {
            tracker.observe(&record(id, 2)).unwrap();
        }
        assert_eq!(tracker.rank_bound(), 3);
        assert_eq!(tracker.working_set_len(), 3);
    }

    #[test]
    fn test_eviction_keeps_size_equal_to_bound() {
        let mut tracker = RankBoundTracker::new();
        // lengths 2, 2 -> s = 2; then a length 2 cannot enter, length 3 enters and
        // evicts a length-2 entry without growing the bound
        tracker.observe(&record(0, 2)).unwrap();
        tracker.observe(&record(1, 2)).unwrap();
        assert_eq!(tracker.rank_bound(), 2);
        tracker.observe(&record(2, 3)).unwrap();
        assert_eq!(tracker.rank_bound(), 2);
        assert_eq!(tracker.working_set_len(), 2);
        let lengths: Vec<usize> = tracker.tracked_lengths().collect();
        assert_eq!(lengths, vec![3, 2]);
    }

    #[test]
    fn test_evicted_record_stays_out() {
        let mut tracker = RankBoundTracker::new();
        let a = record(0, 2);
        tracker.observe(&a).unwrap();
        tracker.observe(&record(1, 2)).unwrap();
        tracker.observe(&record(2, 3)).unwrap(); // evicts `a` from the tail
        tracker.observe(&record(3, 3)).unwrap();
        tracker.observe(&record(4, 3)).unwrap();
        assert_eq!(tracker.rank_bound(), 3);
        // Too short to re-enter once evicted
        tracker.observe(&a).unwrap();
        assert_eq!(tracker.rank_bound(), 3);
    }

    #[test]
    fn test_tie_break_latest_first() {
        let mut tracker = RankBoundTracker::new();
        tracker.observe(&record(0, 5)).unwrap();
        tracker.observe(&record(1, 5)).unwrap();
        tracker.observe(&record(2, 5)).unwrap();
        assert_eq!(tracker.working_set[0].record, record(2, 5));
        assert_eq!(tracker.working_set[2].record, record(0, 5));
    }

    #[test]
    fn test_entries_at_least_bound_at_rest() {
        let lengths = [1, 7, 2, 2, 9, 3, 3, 4, 1, 5, 6, 2, 8];
        let mut tracker = RankBoundTracker::new();
        for (id, len) in lengths.into_iter().enumerate() {
            let before = tracker.rank_bound();
            tracker.observe(&record(id, len)).unwrap();
            assert!(tracker.rank_bound() >= before);
            assert_eq!(tracker.working_set_len() as u64, tracker.rank_bound());
            assert!(tracker
                .tracked_lengths()
                .all(|l| l as u64 >= tracker.rank_bound()));
        }
        assert_eq!(tracker.rank_bound(), h_index(&lengths));
    }

    #[test]
    fn test_malformed_record_fails_pass() {
        let data = "1 2 -1 -2\n3 4 -1\n5 -1 -2\n";
        let err = RankBoundTracker::scan(Cursor::new(data)).unwrap_err();
        match err {
            crate::error::SeqBoundError::MalformedRecord { line, .. } => assert_eq!(line, 2),
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_reader() {
        let data = "1 2 3 -1 -2\n4 5 -1 6 -1 -2\n7 -1 -2\n7 -1 -2\n";
        let result = RankBoundTracker::scan(Cursor::new(data)).unwrap();
        assert_eq!(result.rank_bound, 2);
        assert_eq!(result.dataset_size, 4);
    }

    #[test]
    fn test_h_index_brute_force() {
        assert_eq!(h_index(&[]), 0);
        assert_eq!(h_index(&[0, 0]), 0);
        assert_eq!(h_index(&[5, 3, 3, 2, 1]), 3);
        assert_eq!(h_index(&[10, 10, 10]), 3);
        assert_eq!(h_index(&[1, 1, 1, 1]), 1);
    }
}
