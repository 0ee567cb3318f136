//! The History Cache (§4.3): a bounded, mutex-guarded, height-ordered
//! sequence of `(height, proposers)` entries.
//!
//! Entries arrive height-increasing from the consensus loop, so insertion is
//! a tail push and eviction pops from the front — a `VecDeque` gives O(1) for
//! both without recency-based LRU machinery: eviction here is strictly
//! FIFO-by-height, so an LRU policy would be the wrong tool.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::address::Address;
use crate::config::MAX_HIS;

/// Bounded ordered cache of `(height, proposers)` mappings, guarded by a
/// single mutex per §4.6.
#[derive(Debug, Default)]
pub struct HistoryCache {
    entries: Mutex<VecDeque<(i64, Vec<Address>)>>,
}

impl HistoryCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self { entries: Mutex::new(VecDeque::new()) }
    }

    /// Append `(height, proposers)`, evicting from the front until the cache
    /// holds at most [`MAX_HIS`] entries.
    ///
    /// Callers are expected to insert in height-increasing order (the
    /// consensus loop's natural order); this is not re-validated here, since
    /// re-sorting on every insert would defeat the O(1)-tail-push property
    /// that makes this cache cheap on the common path.
    pub fn insert(&self, height: i64, proposers: Vec<Address>) {
        let mut entries = self.entries.lock();
        entries.push_back((height, proposers));
        while entries.len() > MAX_HIS {
            entries.pop_front();
        }
    }

    /// Return the proposers of the largest-height entry whose height is
    /// `<= round`, or `None` if no such entry exists.
    pub fn lookup(&self, round: i64) -> Option<Vec<Address>> {
        let entries = self.entries.lock();
        // Entries are height-ascending, so a linear scan from the back finds
        // the floor in the common case (`MAX_HIS` is small, 100 by default);
        // a binary search would trade a constant-factor win for no asymptotic
        // one at this bound.
        entries
            .iter()
            .rev()
            .find(|(height, _)| *height <= round)
            .map(|(_, proposers)| proposers.clone())
    }

    /// Number of entries currently cached (test/diagnostic use).
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
