//! Sidecar metadata for a cached rule list.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::{Error, Result};

/// What is known about the last successful download of a list.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UpdateMetadata {
    /// When the cached copy was last written or confirmed fresh
    #[serde(with = "unix_secs", default)]
    pub last_updated: Option<SystemTime>,
    /// `ETag` header of the cached copy
    #[serde(default)]
    pub etag: Option<String>,
    /// URL the cached copy came from
    #[serde(default)]
    pub url: Option<String>,
    /// Rule lines in the cached copy
    #[serde(default)]
    pub rules: usize,
}

mod unix_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        time.map(|t| t.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs())
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SystemTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(|s| UNIX_EPOCH + Duration::from_secs(s)))
    }
}

impl UpdateMetadata {
    /// Metadata for a list fetched just now.
    pub fn fetched(url: &str, etag: Option<String>, rules: usize) -> Self {
        Self {
            last_updated: Some(SystemTime::now()),
            etag,
            url: Some(url.to_string()),
            rules,
        }
    }

    /// Sidecar path for a cached list: `<list>.meta`.
    pub fn path_for(list: &Path) -> PathBuf {
        let mut name = list.as_os_str().to_os_string();
        name.push(".meta");
        PathBuf::from(name)
    }

    /// Load metadata, or the default if the file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Mark the cached copy as confirmed fresh (e.g. after a 304).
    pub fn touch(&mut self) {
        self.last_updated = Some(SystemTime::now());
    }

    /// Whether `interval` has passed since the last update.
    ///
    /// Always true when no update was ever recorded, or when the clock went
    /// backwards.
    pub fn needs_update(&self, interval: Duration) -> bool {
        match self.last_updated {
            None => true,
            Some(last) => SystemTime::now()
                .duration_since(last)
                .map_or(true, |elapsed| elapsed >= interval),
        }
    }
}
