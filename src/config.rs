//! Database and rule source configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Canonical download location of the Public Suffix List.
pub const DEFAULT_LIST_URL: &str =
    "https://raw.githubusercontent.com/publicsuffix/list/master/public_suffix_list.dat";

/// Default initial capacity of the rule buffer (full PSL text is ~230 KiB).
pub const DEFAULT_BUFFER_CAPACITY: usize = 256 * 1024;

/// Shortest hostname the matcher will look at.
pub const DEFAULT_MIN_HOSTNAME_LEN: usize = 2;

/// What to report for a dotted hostname whose suffix is not listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnlistedPolicy {
    /// Report nothing: all spans empty, `icann = false`
    #[default]
    Empty,
    /// Report the whole hostname as the eTLD+1, with empty TLD/eTLD
    WholeHostname,
}

impl FromStr for UnlistedPolicy {
    type Err = String;

    /// Parse a policy name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "empty" | "none" => Ok(UnlistedPolicy::Empty),
            "whole" | "whole_hostname" | "whole-hostname" | "hostname" => {
                Ok(UnlistedPolicy::WholeHostname)
            }
            _ => Err(format!(
                "unknown unlisted policy {:?} (expected \"empty\" or \"whole_hostname\")",
                s
            )),
        }
    }
}

impl UnlistedPolicy {
    /// Get the internal name of this policy.
    pub fn name(&self) -> &'static str {
        match self {
            UnlistedPolicy::Empty => "empty",
            UnlistedPolicy::WholeHostname => "whole_hostname",
        }
    }
}

/// Configuration for a [`Database`](crate::Database).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Result for hostnames with no matching rule
    pub unlisted: UnlistedPolicy,
    /// Hostnames shorter than this never match
    pub min_hostname_len: usize,
    /// Initial rule buffer capacity in bytes
    pub buffer_capacity: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            unlisted: UnlistedPolicy::Empty,
            min_hostname_len: DEFAULT_MIN_HOSTNAME_LEN,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl DatabaseConfig {
    /// Create a configuration with the given unlisted-suffix policy.
    pub fn with_unlisted(unlisted: UnlistedPolicy) -> Self {
        Self {
            unlisted,
            ..Self::default()
        }
    }
}

/// Configuration for a cached remote rule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// URL to download the list from
    pub url: String,
    /// Local file the list is cached in
    pub cache_path: PathBuf,
    /// Age after which the cached copy is refreshed
    pub expire: Duration,
    /// HTTP request timeout
    pub timeout: Duration,
}

impl RemoteConfig {
    /// Create a configuration with default expiry (1 day) and timeout (60s).
    pub fn new(url: impl Into<String>, cache_path: impl AsRef<Path>) -> Self {
        Self {
            url: url.into(),
            cache_path: cache_path.as_ref().to_path_buf(),
            expire: Duration::from_secs(86400),
            timeout: Duration::from_secs(60),
        }
    }

    /// Configuration for the canonical PSL URL.
    pub fn full(cache_path: impl AsRef<Path>) -> Self {
        Self::new(DEFAULT_LIST_URL, cache_path)
    }

    /// Set the expiry interval.
    pub fn with_expire(mut self, expire: Duration) -> Self {
        self.expire = expire;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
