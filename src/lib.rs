//! suffixdb - A compact, thread-safe Public Suffix List database.
//!
//! This crate splits hostnames into their public suffix components using the
//! rules of the [Public Suffix List](https://publicsuffix.org/).
//!
//! # Features
//!
//! - **Compact storage**: All rule text in one buffer, indexed by 64-bit hashes
//!   mapped to packed 8-byte entries
//! - **Full rule syntax**: Regular, wildcard (`*.ck`) and exception (`!www.ck`) rules
//! - **ICANN/private sections**: Every match reports which section it came from
//! - **IDN support**: Non-ASCII rules are also indexed in their Punycode form
//! - **Zero-copy results**: Results borrow the hostname or the rule buffer
//! - **Thread-safe**: Concurrent lookups, exclusive reloads
//! - **Remote list management**: Download, cache and refresh the list from a URL
//!
//! # Quick Start
//!
//! ```
//! use suffixdb::{Database, Fnv1a};
//!
//! let db = Database::new(Fnv1a);
//! db.load_from_str(
//!     "// ===BEGIN ICANN DOMAINS===\nuk\nco.uk\n*.ck\n!www.ck\n// ===END ICANN DOMAINS===\n",
//! )?;
//!
//! let parts = db.parse_str("www.example.co.uk")?;
//! assert_eq!(parts.tld, "uk");
//! assert_eq!(parts.etld, "co.uk");
//! assert_eq!(parts.etld1, "example.co.uk");
//! assert!(parts.icann);
//!
//! assert_eq!(db.etld1_str("www.ck")?, "www.ck");
//! # Ok::<(), suffixdb::Error>(())
//! ```
//!
//! # Remote Lists
//!
//! Use [`RemoteList`] to keep a local copy of the list up to date:
//!
//! ```no_run
//! use suffixdb::{Database, RemoteConfig, RemoteList, AHash64};
//!
//! let db = Database::new(AHash64::new());
//! let mut list = RemoteList::new(RemoteConfig::full("/var/cache/suffixdb/list.dat"));
//! list.load_or_fetch(&db)?;
//!
//! // Later, refresh if the list changed (ETag, 304 Not Modified)
//! if list.update(&db)? {
//!     println!("List updated!");
//! }
//! # Ok::<(), suffixdb::Error>(())
//! ```
//!
//! # Matching
//!
//! A hostname is matched against its strict suffixes, longest first:
//! 1. A regular rule makes the suffix the eTLD
//! 2. A wildcard rule extends the suffix by one label, unless an exception
//!    rule names exactly that extended suffix
//! 3. The eTLD+1 is the eTLD plus the label in front of it
//!
//! Hostnames whose suffix is not listed produce empty results by default; see
//! [`UnlistedPolicy`].

mod error;
mod metadata;
mod rule_kind;

pub mod config;
pub mod db;
pub mod hasher;
pub mod normalize;
pub mod remote;
pub mod source;

// Re-export core types
pub use error::{Error, NormalizeError, Result};
pub use rule_kind::RuleKind;

// Re-export database types
pub use db::{
    Database, DatabaseBuilder, Entry, FrozenDatabase, LoadStats, Parts, Reader, Rule, StoreStats,
    StrParts,
};

// Re-export the pluggable seams
pub use hasher::{AHash64, Fnv1a, SuffixHasher};
pub use normalize::{AsciiNormalizer, Idna};

// Re-export configuration
pub use config::{DatabaseConfig, RemoteConfig, UnlistedPolicy, DEFAULT_LIST_URL};

// Re-export list sources
pub use remote::RemoteList;
pub use source::{RuleLine, RuleLines};

// Re-export metadata
pub use metadata::UpdateMetadata;
