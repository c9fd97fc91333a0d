//! Rule ingestion: classify, strip markers, store.

use super::entry::Entry;
use super::index::{IndexKind, RuleStore};
use crate::error::Result;
use crate::hasher::SuffixHasher;
use crate::normalize::{to_ascii_bytes, AsciiNormalizer};
use crate::RuleKind;

/// A classified rule with its markers stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule<'a> {
    /// Rule classification
    pub kind: RuleKind,
    /// Rule text without the `*.` or `!` marker
    pub text: &'a [u8],
}

impl<'a> Rule<'a> {
    /// Classify a rule line. Returns `None` if nothing remains after the
    /// marker is stripped.
    pub fn classify(line: &'a [u8]) -> Option<Self> {
        let kind = RuleKind::of_line(line);
        let text = line.get(kind.marker_len()..).unwrap_or_default();
        if text.is_empty() {
            return None;
        }
        Some(Self { kind, text })
    }
}

/// Writes rules into a store. Holds no lock; callers own the store mutably.
pub(crate) struct Ingestor<'s> {
    pub store: &'s mut RuleStore,
    pub hasher: &'s dyn SuffixHasher,
    pub normalizer: Option<&'s dyn AsciiNormalizer>,
}

impl Ingestor<'_> {
    /// Ingest one rule line. Returns the number of entries stored.
    ///
    /// Non-ASCII rules are stored a second time in their ASCII form when a
    /// normalizer is available and accepts them.
    pub fn ingest(&mut self, line: &[u8], icann: bool) -> Result<usize> {
        let Some(rule) = Rule::classify(line) else {
            return Ok(0);
        };
        self.store_rule(rule.kind, rule.text, icann)?;

        if rule.text.is_ascii() {
            return Ok(1);
        }
        let Some(normalizer) = self.normalizer else {
            return Ok(1);
        };
        match to_ascii_bytes(normalizer, rule.text) {
            Ok(ascii) if !ascii.is_empty() && ascii.as_bytes() != rule.text => {
                self.store_rule(rule.kind, ascii.as_bytes(), icann)?;
                Ok(2)
            }
            Ok(_) => Ok(1),
            Err(e) => {
                log::debug!(
                    "skipping ASCII form of {:?}: {}",
                    String::from_utf8_lossy(rule.text),
                    e
                );
                Ok(1)
            }
        }
    }

    fn store_rule(&mut self, kind: RuleKind, text: &[u8], icann: bool) -> Result<()> {
        let hash = self.hasher.hash64(text);
        let (lo, hi) = self.store.append(text)?;
        let entry = Entry::encode(lo, hi, icann, kind)?;
        let index = if kind.is_negative() {
            IndexKind::Negative
        } else {
            IndexKind::Positive
        };
        self.store.set(index, hash, entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;
    use crate::hasher::Fnv1a;

    fn ingest_all(
        store: &mut RuleStore,
        normalizer: Option<&dyn AsciiNormalizer>,
        lines: &[(&str, bool)],
    ) -> usize {
        let mut ingestor = Ingestor {
            store,
            hasher: &Fnv1a,
            normalizer,
        };
        lines
            .iter()
            .map(|(line, icann)| ingestor.ingest(line.as_bytes(), *icann).unwrap())
            .sum()
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            Rule::classify(b"*.ck"),
            Some(Rule {
                kind: RuleKind::Wildcard,
                text: b"ck"
            })
        );
        assert_eq!(
            Rule::classify(b"!www.ck"),
            Some(Rule {
                kind: RuleKind::Exception,
                text: b"www.ck"
            })
        );
        assert_eq!(
            Rule::classify(b"co.uk"),
            Some(Rule {
                kind: RuleKind::Regular,
                text: b"co.uk"
            })
        );
        assert_eq!(Rule::classify(b""), None);
        assert_eq!(Rule::classify(b"!"), None);
        assert_eq!(Rule::classify(b"*."), None);
        assert_eq!(Rule::classify(b"*"), None);
    }

    #[test]
    fn test_rules_land_in_their_index() {
        let mut store = RuleStore::default();
        let stored = ingest_all(
            &mut store,
            None,
            &[("com", true), ("*.ck", true), ("!www.ck", false)],
        );
        assert_eq!(stored, 3);

        let com = store.lookup(IndexKind::Positive, Fnv1a.hash64(b"com")).unwrap();
        assert_eq!(com.kind(), RuleKind::Regular);
        assert!(com.icann());
        assert_eq!(store.rule_bytes(com), b"com");

        let ck = store.lookup(IndexKind::Positive, Fnv1a.hash64(b"ck")).unwrap();
        assert_eq!(ck.kind(), RuleKind::Wildcard);

        let www = store.lookup(IndexKind::Negative, Fnv1a.hash64(b"www.ck")).unwrap();
        assert_eq!(www.kind(), RuleKind::Exception);
        assert!(!www.icann());
        assert_eq!(store.lookup(IndexKind::Positive, Fnv1a.hash64(b"www.ck")), None);
    }

    #[test]
    fn test_empty_rule_is_noop() {
        let mut store = RuleStore::default();
        assert_eq!(ingest_all(&mut store, None, &[("!", true), ("*.", true)]), 0);
        assert_eq!(store.stats().buffer_len, 0);
    }

    #[test]
    fn test_non_ascii_rule_stored_twice() {
        let fake_punycode = |s: &str| {
            assert_eq!(s, "рф");
            Ok::<_, NormalizeError>("xn--p1ai".to_string())
        };
        let mut store = RuleStore::default();
        let stored = ingest_all(&mut store, Some(&fake_punycode), &[("рф", true)]);
        assert_eq!(stored, 2);

        let unicode = store
            .lookup(IndexKind::Positive, Fnv1a.hash64("рф".as_bytes()))
            .unwrap();
        let ascii = store
            .lookup(IndexKind::Positive, Fnv1a.hash64(b"xn--p1ai"))
            .unwrap();
        assert!(unicode.icann() && ascii.icann());
        assert_eq!(store.rule_bytes(ascii), b"xn--p1ai");
    }

    #[test]
    fn test_ascii_duplicate_keeps_kind() {
        let fake_punycode = |_: &str| Ok::<_, NormalizeError>("xn--ehqz56n.cn".to_string());
        let mut store = RuleStore::default();
        ingest_all(&mut store, Some(&fake_punycode), &[("!公司.cn", false)]);

        let entry = store
            .lookup(IndexKind::Negative, Fnv1a.hash64(b"xn--ehqz56n.cn"))
            .unwrap();
        assert_eq!(entry.kind(), RuleKind::Exception);
        assert!(!entry.icann());
    }

    #[test]
    fn test_failed_normalization_is_skipped() {
        let failing = |_: &str| Err::<String, _>(NormalizeError::Idna("bad".into()));
        let mut store = RuleStore::default();
        let stored = ingest_all(&mut store, Some(&failing), &[("рф", true)]);
        assert_eq!(stored, 1);
        assert!(store
            .lookup(IndexKind::Positive, Fnv1a.hash64("рф".as_bytes()))
            .is_some());
    }
}
