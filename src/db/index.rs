//! Rule buffer and hash indices.
//!
//! All rule text lives in one contiguous buffer. The two indices map the
//! hash of a rule's text to a packed [`Entry`] pointing back into that
//! buffer, so neither map owns any byte strings.

use ahash::AHashMap;
use std::ops::Range;

use super::entry::{Entry, MAX_OFFSET};
use crate::error::{Error, Result};

/// Which of the two indices to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IndexKind {
    /// Regular and wildcard rules
    Positive,
    /// Exception rules
    Negative,
}

/// Sizes of the rule store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Entries in the positive index
    pub positive: usize,
    /// Entries in the negative index
    pub negative: usize,
    /// Bytes of rule text in the buffer
    pub buffer_len: usize,
    /// Allocated buffer capacity
    pub buffer_capacity: usize,
}

impl StoreStats {
    /// Total number of index entries.
    pub fn entries(&self) -> usize {
        self.positive + self.negative
    }
}

/// Rule buffer plus positive/negative indices.
#[derive(Debug, Default)]
pub(crate) struct RuleStore {
    buf: Vec<u8>,
    positive: AHashMap<u64, Entry>,
    negative: AHashMap<u64, Entry>,
}

impl RuleStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            positive: AHashMap::new(),
            negative: AHashMap::new(),
        }
    }

    /// Append rule text and return its `(lo, hi)` range.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(u32, u32)> {
        let lo = self.buf.len();
        let hi = lo + bytes.len();
        if hi > MAX_OFFSET as usize {
            return Err(Error::CapacityExceeded {
                offset: hi,
                max: MAX_OFFSET,
            });
        }
        self.buf.extend_from_slice(bytes);
        Ok((lo as u32, hi as u32))
    }

    /// Insert an entry; the last writer for a hash wins.
    ///
    /// Returns the entry that was replaced, if any.
    pub fn set(&mut self, kind: IndexKind, hash: u64, entry: Entry) -> Option<Entry> {
        let prev = self.map_mut(kind).insert(hash, entry);
        if let Some(old) = prev {
            if self.rule_bytes(old) != self.rule_bytes(entry) {
                log::warn!(
                    "hash collision in {:?} index: {:?} replaced by {:?}",
                    kind,
                    String::from_utf8_lossy(self.rule_bytes(old)),
                    String::from_utf8_lossy(self.rule_bytes(entry)),
                );
            }
        }
        prev
    }

    #[inline]
    pub fn lookup(&self, kind: IndexKind, hash: u64) -> Option<Entry> {
        self.map(kind).get(&hash).copied()
    }

    /// Bytes an entry points at; empty if the range is stale.
    pub fn rule_bytes(&self, entry: Entry) -> &[u8] {
        self.slice(entry.range())
    }

    #[inline]
    pub fn slice(&self, range: Range<usize>) -> &[u8] {
        self.buf.get(range).unwrap_or_default()
    }

    /// Drop every entry and truncate the buffer, keeping its capacity.
    pub fn reset(&mut self) {
        self.positive.clear();
        self.negative.clear();
        self.buf.clear();
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            positive: self.positive.len(),
            negative: self.negative.len(),
            buffer_len: self.buf.len(),
            buffer_capacity: self.buf.capacity(),
        }
    }

    fn map(&self, kind: IndexKind) -> &AHashMap<u64, Entry> {
        match kind {
            IndexKind::Positive => &self.positive,
            IndexKind::Negative => &self.negative,
        }
    }

    fn map_mut(&mut self, kind: IndexKind) -> &mut AHashMap<u64, Entry> {
        match kind {
            IndexKind::Positive => &mut self.positive,
            IndexKind::Negative => &mut self.negative,
        }
    }
}
