//! Hostname matching against the rule store.
//!
//! The matcher drops one leading label per step and probes the positive
//! index with what is left, so the first hit is the longest listed suffix.
//! For `a.b.example.co.uk` the probes are:
//!
//! ```text
//! b.example.co.uk
//! example.co.uk
//! co.uk          <- hit
//! ```

use std::ops::Range;

use super::index::{IndexKind, RuleStore};
use crate::config::{DatabaseConfig, UnlistedPolicy};
use crate::hasher::SuffixHasher;
use crate::RuleKind;

/// The public suffix components of a hostname.
///
/// Every span borrows either the queried hostname or the database's rule
/// buffer; nothing is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Parts<'a> {
    /// Rightmost label of the matched suffix (`uk` for `co.uk`)
    pub tld: &'a [u8],
    /// Matched suffix if it has more than one label, empty otherwise
    pub etld: &'a [u8],
    /// Matched suffix plus one label: the registrable domain
    pub etld1: &'a [u8],
    /// Whether the matched rule is from the ICANN section
    pub icann: bool,
}

impl<'a> Parts<'a> {
    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.tld.is_empty() && self.etld.is_empty() && self.etld1.is_empty()
    }

    fn from_suffix(suffix: &'a [u8], etld1: &'a [u8], icann: bool) -> Self {
        let (tld, etld) = split_suffix(suffix);
        Self {
            tld,
            etld,
            etld1,
            icann,
        }
    }
}

/// String form of [`Parts`], borrowing the queried hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrParts<'a> {
    /// Rightmost label of the matched suffix
    pub tld: &'a str,
    /// Matched suffix if it has more than one label, empty otherwise
    pub etld: &'a str,
    /// The registrable domain
    pub etld1: &'a str,
    /// Whether the matched rule is from the ICANN section
    pub icann: bool,
}

impl StrParts<'_> {
    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.tld.is_empty() && self.etld.is_empty() && self.etld1.is_empty()
    }
}

/// Result of a scan, in offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// No rule applies
    NoMatch,
    /// Dotted hostname with an unlisted suffix, reported whole
    Unlisted,
    /// A rule matched
    Matched {
        /// Start of the effective suffix in the hostname
        suffix: usize,
        /// Buffer range of the matched regular rule
        rule: Option<Range<usize>>,
        /// Start of the eTLD+1 in the hostname
        etld1: usize,
        icann: bool,
    },
}

/// Offsets of each component within the hostname.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Spans {
    pub tld: Range<usize>,
    pub etld: Range<usize>,
    pub etld1: Range<usize>,
    pub icann: bool,
}

impl Outcome {
    /// Component offsets, taking every suffix from the hostname.
    ///
    /// A regular rule is found by the hash of `hostname[suffix..]`, so the
    /// hostname bytes equal the rule text unless two rules collide.
    pub fn spans(&self, hostname: &[u8]) -> Spans {
        let len = hostname.len();
        match *self {
            Outcome::NoMatch => Spans::default(),
            Outcome::Unlisted => Spans {
                etld1: 0..len,
                ..Spans::default()
            },
            Outcome::Matched {
                suffix,
                etld1,
                icann,
                ..
            } => {
                let (tld, etld) = split_suffix_range(hostname, suffix..len);
                Spans {
                    tld,
                    etld,
                    etld1: etld1..len,
                    icann,
                }
            }
        }
    }

    /// Resolve against the hostname only.
    pub fn host_parts<'a>(&self, hostname: &'a [u8]) -> Parts<'a> {
        let spans = self.spans(hostname);
        Parts {
            tld: &hostname[spans.tld],
            etld: &hostname[spans.etld],
            etld1: &hostname[spans.etld1],
            icann: spans.icann,
        }
    }

    /// Resolve against a hostname string.
    pub fn str_parts<'a>(&self, hostname: &'a str) -> StrParts<'a> {
        // Every span starts at 0 or right after an ASCII dot and ends at
        // the end of the hostname, so all of them are char boundaries.
        let spans = self.spans(hostname.as_bytes());
        StrParts {
            tld: &hostname[spans.tld],
            etld: &hostname[spans.etld],
            etld1: &hostname[spans.etld1],
            icann: spans.icann,
        }
    }

    /// Resolve regular-rule suffixes against the rule buffer.
    pub fn buffer_parts<'a>(&self, hostname: &'a [u8], store: &'a RuleStore) -> Parts<'a> {
        match self {
            Outcome::Matched {
                rule: Some(range),
                etld1,
                icann,
                ..
            } => Parts::from_suffix(store.slice(range.clone()), &hostname[*etld1..], *icann),
            _ => self.host_parts(hostname),
        }
    }
}

/// Runs the suffix scan over one store.
pub(crate) struct Matcher<'s> {
    pub store: &'s RuleStore,
    pub hasher: &'s dyn SuffixHasher,
    pub config: &'s DatabaseConfig,
}

impl Matcher<'_> {
    /// Scan a hostname. Returns on the first (longest) listed suffix.
    pub fn find(&self, hostname: &[u8]) -> Outcome {
        if hostname.len() < self.config.min_hostname_len.max(1) {
            return Outcome::NoMatch;
        }

        let mut off = 0;
        let mut dots = 0usize;
        loop {
            let poff = off;
            let Some(dot) = find_dot(hostname, off) else {
                if dots > 0 && self.config.unlisted == UnlistedPolicy::WholeHostname {
                    return Outcome::Unlisted;
                }
                return Outcome::NoMatch;
            };
            off = dot + 1;
            dots += 1;

            let part = &hostname[off..];
            let Some(entry) = self
                .store
                .lookup(IndexKind::Positive, self.hasher.hash64(part))
            else {
                continue;
            };

            let icann = entry.icann();
            return match entry.kind() {
                RuleKind::Wildcard => {
                    // The wildcard swallows the label in front of the rule,
                    // unless an exception names that exact combination.
                    let candidate = &hostname[poff..];
                    let anchor = if self
                        .store
                        .lookup(IndexKind::Negative, self.hasher.hash64(candidate))
                        .is_some()
                    {
                        off
                    } else {
                        poff
                    };
                    Outcome::Matched {
                        suffix: anchor,
                        rule: None,
                        etld1: label_start(hostname, anchor),
                        icann,
                    }
                }
                _ => Outcome::Matched {
                    suffix: off,
                    rule: Some(entry.range()),
                    etld1: label_start(hostname, off),
                    icann,
                },
            };
        }
    }
}

/// Offset of the next dot at or after `from`.
#[inline]
fn find_dot(hostname: &[u8], from: usize) -> Option<usize> {
    hostname
        .get(from..)?
        .iter()
        .position(|&b| b == b'.')
        .map(|i| from + i)
}

/// Start of the label in front of the one starting at `pos`.
///
/// Scans backward from `pos - 2`, skipping the dot just before `pos`. A dot
/// at index 0 does not count, so a hostname with a leading dot keeps it.
#[inline]
fn label_start(hostname: &[u8], pos: usize) -> usize {
    let end = pos.saturating_sub(1);
    hostname[..end]
        .iter()
        .rposition(|&b| b == b'.')
        .filter(|&i| i > 0)
        .map_or(0, |i| i + 1)
}

/// Split a suffix into `(tld, etld)`.
fn split_suffix(suffix: &[u8]) -> (&[u8], &[u8]) {
    match suffix.iter().rposition(|&b| b == b'.') {
        Some(i) => (&suffix[i + 1..], suffix),
        None => (suffix, &[]),
    }
}

/// Split a suffix range within `hostname` into `(tld, etld)` ranges.
fn split_suffix_range(hostname: &[u8], suffix: Range<usize>) -> (Range<usize>, Range<usize>) {
    match hostname[suffix.clone()].iter().rposition(|&b| b == b'.') {
        Some(i) => (suffix.start + i + 1..suffix.end, suffix),
        None => (suffix, 0..0),
    }
}
