//! The public suffix database.
//!
//! A [`Database`] owns one rule buffer and two hash indices behind a
//! reader/writer lock. Loads and resets take the lock exclusively for their
//! whole duration; lookups share it.
//!
//! ```text
//! raw lines ──▶ RuleLines ──▶ Ingestor ──▶ RuleStore ◀── Matcher ◀── parse()
//!                             (write lock)              (read lock)
//! ```

mod entry;
mod index;
mod ingest;
mod matcher;


pub use entry::{Entry, MAX_OFFSET, OFFSET_BITS};
pub use index::StoreStats;
pub use ingest::Rule;
pub use matcher::{Parts, StrParts};

use parking_lot::{RwLock, RwLockReadGuard};
use std::io::{BufRead, BufReader, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use crate::hasher::SuffixHasher;
use crate::normalize::{AsciiNormalizer, Idna};
use crate::source::RuleLines;
use index::RuleStore;
use ingest::Ingestor;
use matcher::{Matcher, Outcome};

/// Summary of a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Rule lines read from the source
    pub lines: usize,
    /// Index entries written, ASCII duplicates included
    pub entries: usize,
}

/// Builder for [`Database`].
///
/// # Examples
/// ```
/// use suffixdb::{Database, Fnv1a};
///
/// let db = Database::builder().hasher(Fnv1a).build().unwrap();
/// assert!(db.is_active());
///
/// assert!(Database::builder().build().is_err());
/// ```
#[derive(Default)]
pub struct DatabaseBuilder {
    hasher: Option<Arc<dyn SuffixHasher>>,
    normalizer: Option<Arc<dyn AsciiNormalizer>>,
    skip_normalizer: bool,
    config: DatabaseConfig,
}

impl DatabaseBuilder {
    /// Set the hash function keying the index. Required.
    pub fn hasher(mut self, hasher: impl SuffixHasher + 'static) -> Self {
        self.hasher = Some(Arc::new(hasher));
        self
    }

    /// Set the normalizer for non-ASCII rules. Defaults to [`Idna`].
    pub fn normalizer(mut self, normalizer: impl AsciiNormalizer + 'static) -> Self {
        self.normalizer = Some(Arc::new(normalizer));
        self.skip_normalizer = false;
        self
    }

    /// Store non-ASCII rules only as written.
    pub fn without_normalizer(mut self) -> Self {
        self.normalizer = None;
        self.skip_normalizer = true;
        self
    }

    /// Set the database configuration.
    pub fn config(mut self, config: DatabaseConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the database. Fails with [`Error::NoHasher`] if no hasher was set.
    pub fn build(self) -> Result<Database> {
        let hasher = self.hasher.ok_or(Error::NoHasher)?;
        let normalizer = match (self.normalizer, self.skip_normalizer) {
            (_, true) => None,
            (Some(n), false) => Some(n),
            (None, false) => Some(Arc::new(Idna) as Arc<dyn AsciiNormalizer>),
        };
        Ok(Database {
            store: RwLock::new(RuleStore::with_capacity(self.config.buffer_capacity)),
            active: AtomicBool::new(true),
            hasher,
            normalizer,
            config: self.config,
        })
    }
}

/// Public suffix database.
///
/// Thread-safe: any number of threads may query while at most one loads or
/// resets.
///
/// # Hash collisions
///
/// Rules are indexed by a 64-bit hash of their text, not the text itself.
/// Two distinct rules with the same hash overwrite each other (the later one
/// wins, with a warning logged), and a hostname suffix that collides with a
/// rule matches it. This is a known limitation of the compact index.
///
/// # Examples
/// ```
/// use suffixdb::{Database, Fnv1a};
///
/// let db = Database::new(Fnv1a);
/// db.load_from_str("// ===BEGIN ICANN DOMAINS===\ncom\nac\norg.ac\n").unwrap();
///
/// let parts = db.parse_str("google.org.ac").unwrap();
/// assert_eq!(parts.tld, "ac");
/// assert_eq!(parts.etld, "org.ac");
/// assert_eq!(parts.etld1, "google.org.ac");
/// assert!(parts.icann);
/// ```
pub struct Database {
    store: RwLock<RuleStore>,
    active: AtomicBool,
    hasher: Arc<dyn SuffixHasher>,
    normalizer: Option<Arc<dyn AsciiNormalizer>>,
    config: DatabaseConfig,
}

impl Database {
    /// Create an empty database with default configuration and [`Idna`]
    /// normalization.
    pub fn new(hasher: impl SuffixHasher + 'static) -> Self {
        Self {
            store: RwLock::new(RuleStore::with_capacity(
                DatabaseConfig::default().buffer_capacity,
            )),
            active: AtomicBool::new(true),
            hasher: Arc::new(hasher),
            normalizer: Some(Arc::new(Idna)),
            config: DatabaseConfig::default(),
        }
    }

    /// Start building a database.
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::default()
    }

    /// Get the configuration.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Whether the database can still be used.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Permanently disable the database. Every later operation fails with
    /// [`Error::Uninitialized`].
    pub fn invalidate(&self) {
        self.active.store(false, Ordering::Release);
    }

    pub(crate) fn check_status(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(Error::Uninitialized)
        }
    }

    // ---- ingestion ----

    /// Add a single rule line (`com`, `*.ck`, `!www.ck`).
    ///
    /// Returns the number of index entries written: 0 for an empty rule, 2
    /// when an ASCII duplicate of a non-ASCII rule was stored.
    pub fn add_rule(&self, line: &[u8], icann: bool) -> Result<usize> {
        self.check_status()?;
        let mut store = self.store.write();
        self.ingestor(&mut store).ingest(line, icann)
    }

    /// String form of [`add_rule`](Self::add_rule).
    pub fn add_rule_str(&self, line: &str, icann: bool) -> Result<usize> {
        self.add_rule(line.as_bytes(), icann)
    }

    /// Add every rule from PSL-formatted text, on top of the current rules.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<LoadStats> {
        self.check_status()?;
        let mut store = self.store.write();
        self.ingest_lines(&mut store, BufReader::new(reader))
    }

    /// Replace all rules with those from PSL-formatted text.
    ///
    /// Readers see either the old or the new rule set, never a mix. On error
    /// the old rule set is kept.
    pub fn reload_from_reader<R: Read>(&self, reader: R) -> Result<LoadStats> {
        self.check_status()?;
        let mut store = self.store.write();
        // Built aside so a failed load leaves the current rules in place.
        let mut fresh = RuleStore::with_capacity(self.config.buffer_capacity);
        let stats = self.ingest_lines(&mut fresh, BufReader::new(reader))?;
        *store = fresh;
        Ok(stats)
    }

    /// Add every rule from PSL-formatted text held in memory.
    pub fn load_from_str(&self, text: &str) -> Result<LoadStats> {
        self.load_from_reader(text.as_bytes())
    }

    fn ingest_lines<B: BufRead>(&self, store: &mut RuleStore, reader: B) -> Result<LoadStats> {
        let mut stats = LoadStats::default();
        let mut ingestor = self.ingestor(store);
        for line in RuleLines::new(reader) {
            let line = line?;
            stats.lines += 1;
            stats.entries += ingestor.ingest(&line.text, line.icann)?;
        }
        log::debug!(
            "Loaded {} rule lines ({} index entries)",
            stats.lines,
            stats.entries
        );
        Ok(stats)
    }

    fn ingestor<'s>(&'s self, store: &'s mut RuleStore) -> Ingestor<'s> {
        Ingestor {
            store,
            hasher: self.hasher.as_ref(),
            normalizer: self.normalizer.as_deref(),
        }
    }

    /// Drop every rule. Buffer capacity is kept for the next load.
    pub fn reset(&self) -> Result<()> {
        self.check_status()?;
        self.store.write().reset();
        Ok(())
    }

    /// Sizes of the buffer and indices.
    pub fn stats(&self) -> Result<StoreStats> {
        self.check_status()?;
        Ok(self.store.read().stats())
    }

    // ---- lookups ----

    /// Split a hostname into TLD, eTLD, eTLD+1 and the ICANN flag.
    ///
    /// All spans borrow `hostname`. Use [`read`](Self::read) for spans that
    /// borrow the stored rule text instead.
    pub fn parse<'h>(&self, hostname: &'h [u8]) -> Result<Parts<'h>> {
        Ok(self.find(hostname)?.host_parts(hostname))
    }

    /// String form of [`parse`](Self::parse).
    pub fn parse_str<'h>(&self, hostname: &'h str) -> Result<StrParts<'h>> {
        Ok(self.find(hostname.as_bytes())?.str_parts(hostname))
    }

    fn find(&self, hostname: &[u8]) -> Result<Outcome> {
        self.check_status()?;
        let store = self.store.read();
        Ok(self.matcher(&store).find(hostname))
    }

    fn matcher<'s>(&'s self, store: &'s RuleStore) -> Matcher<'s> {
        Matcher {
            store,
            hasher: self.hasher.as_ref(),
            config: &self.config,
        }
    }

    /// TLD of a hostname.
    pub fn tld<'h>(&self, hostname: &'h [u8]) -> Result<&'h [u8]> {
        Ok(self.parse(hostname)?.tld)
    }

    /// Effective TLD of a hostname.
    pub fn etld<'h>(&self, hostname: &'h [u8]) -> Result<&'h [u8]> {
        Ok(self.parse(hostname)?.etld)
    }

    /// Registrable domain (eTLD+1) of a hostname.
    pub fn etld1<'h>(&self, hostname: &'h [u8]) -> Result<&'h [u8]> {
        Ok(self.parse(hostname)?.etld1)
    }

    /// Whether the rule matching a hostname is from the ICANN section.
    pub fn icann(&self, hostname: &[u8]) -> Result<bool> {
        Ok(self.parse(hostname)?.icann)
    }

    /// String form of [`tld`](Self::tld).
    pub fn tld_str<'h>(&self, hostname: &'h str) -> Result<&'h str> {
        Ok(self.parse_str(hostname)?.tld)
    }

    /// String form of [`etld`](Self::etld).
    pub fn etld_str<'h>(&self, hostname: &'h str) -> Result<&'h str> {
        Ok(self.parse_str(hostname)?.etld)
    }

    /// String form of [`etld1`](Self::etld1).
    pub fn etld1_str<'h>(&self, hostname: &'h str) -> Result<&'h str> {
        Ok(self.parse_str(hostname)?.etld1)
    }

    /// Hold the read lock for a batch of lookups.
    ///
    /// Spans returned by [`Reader::parse`] for regular rules borrow the rule
    /// buffer, which stays valid as long as the reader is alive.
    pub fn read(&self) -> Result<Reader<'_>> {
        self.check_status()?;
        Ok(Reader {
            db: self,
            store: self.store.read(),
        })
    }

    /// Give up the lock for lock-free lookups once loading is done.
    pub fn freeze(self) -> Result<FrozenDatabase> {
        self.check_status()?;
        Ok(FrozenDatabase {
            store: self.store.into_inner(),
            hasher: self.hasher,
            normalizer: self.normalizer,
            config: self.config,
        })
    }
}

/// Shared-lock view of a [`Database`].
pub struct Reader<'db> {
    db: &'db Database,
    store: RwLockReadGuard<'db, RuleStore>,
}

impl Reader<'_> {
    /// Split a hostname; regular-rule suffixes borrow the rule buffer.
    pub fn parse<'a>(&'a self, hostname: &'a [u8]) -> Parts<'a> {
        self.db
            .matcher(&self.store)
            .find(hostname)
            .buffer_parts(hostname, &self.store)
    }

    /// Split a hostname string; all spans borrow `hostname`.
    pub fn parse_str<'h>(&self, hostname: &'h str) -> StrParts<'h> {
        self.db
            .matcher(&self.store)
            .find(hostname.as_bytes())
            .str_parts(hostname)
    }

    /// Sizes of the buffer and indices.
    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }
}

/// Lock-free, read-only database.
///
/// Produced by [`Database::freeze`]; ownership guarantees no writer exists.
pub struct FrozenDatabase {
    store: RuleStore,
    hasher: Arc<dyn SuffixHasher>,
    normalizer: Option<Arc<dyn AsciiNormalizer>>,
    config: DatabaseConfig,
}

impl FrozenDatabase {
    fn matcher(&self) -> Matcher<'_> {
        Matcher {
            store: &self.store,
            hasher: self.hasher.as_ref(),
            config: &self.config,
        }
    }

    /// Split a hostname; regular-rule suffixes borrow the rule buffer.
    pub fn parse<'a>(&'a self, hostname: &'a [u8]) -> Parts<'a> {
        self.matcher()
            .find(hostname)
            .buffer_parts(hostname, &self.store)
    }

    /// Split a hostname string; all spans borrow `hostname`.
    pub fn parse_str<'h>(&self, hostname: &'h str) -> StrParts<'h> {
        self.matcher()
            .find(hostname.as_bytes())
            .str_parts(hostname)
    }

    /// Sizes of the buffer and indices.
    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    /// Return to a lockable, writable database.
    pub fn thaw(self) -> Database {
        Database {
            store: RwLock::new(self.store),
            active: AtomicBool::new(true),
            hasher: self.hasher,
            normalizer: self.normalizer,
            config: self.config,
        }
    }
}
