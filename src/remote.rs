//! Loading rule lists from files and URLs.
//!
//! This module provides:
//! - [`Database::load_file`] and [`Database::fetch`] for one-shot loads
//! - [`RemoteList`], which keeps a local copy of a remote list fresh using
//!   ETag-based conditional requests and atomic cache updates
//!
//! Gzip-compressed lists are detected by their magic bytes and decompressed
//! transparently.

use flate2::read::GzDecoder;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::RemoteConfig;
use crate::db::{Database, LoadStats};
use crate::error::{Error, Result};
use crate::metadata::UpdateMetadata;
use crate::source::RuleLines;

impl Database {
    /// Replace all rules with the list stored at `path`.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<LoadStats> {
        self.check_status()?;
        let path = path.as_ref();
        let data = decompress(fs::read(path)?)?;
        let stats = self.reload_from_reader(&data[..])?;
        log::info!("Loaded {} rules from {}", stats.lines, path.display());
        Ok(stats)
    }

    /// Replace all rules with the list downloaded from `url`.
    pub fn fetch(&self, url: &str) -> Result<LoadStats> {
        self.check_status()?;
        let Download::Body { data, .. } = download(&ureq::agent(), url, None)? else {
            return Err(Error::Download(format!("{}: unexpected 304 Not Modified", url)));
        };
        ensure_rules(&data, url)?;
        self.reload_from_reader(&data[..])
    }
}

/// Local cache of a remote rule list.
///
/// # Example
///
/// ```no_run
/// use suffixdb::{Database, Fnv1a, RemoteConfig, RemoteList};
///
/// let db = Database::new(Fnv1a);
/// let mut list = RemoteList::new(RemoteConfig::full("/tmp/suffixdb/public_suffix_list.dat"));
///
/// // Loads the cached copy, downloading first if it is missing or stale
/// list.load_or_fetch(&db)?;
/// assert_eq!(db.etld1_str("www.example.co.uk")?, "example.co.uk");
/// # Ok::<(), suffixdb::Error>(())
/// ```
pub struct RemoteList {
    config: RemoteConfig,
    agent: ureq::Agent,
    /// ETag from the last download (for conditional requests)
    etag: Option<String>,
    metadata_path: PathBuf,
}

enum Download {
    Body { data: Vec<u8>, etag: Option<String> },
    NotModified,
}

impl RemoteList {
    pub fn new(config: RemoteConfig) -> Self {
        let metadata_path = UpdateMetadata::path_for(&config.cache_path);
        let etag = UpdateMetadata::load(&metadata_path)
            .ok()
            .and_then(|meta| meta.etag);
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self {
            config,
            agent,
            etag,
            metadata_path,
        }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Path of the cached list.
    pub fn cache_path(&self) -> &Path {
        &self.config.cache_path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.config.cache_path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Current ETag, if any.
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Load the cached copy into `db`, replacing its rules.
    pub fn load(&self, db: &Database) -> Result<LoadStats> {
        db.load_file(self.cache_path())
    }

    /// Download the list unconditionally, update the cache and load it.
    pub fn fetch(&mut self, db: &Database) -> Result<LoadStats> {
        self.download(false)?;
        self.load(db)
    }

    /// Download the list only if it changed since the cached copy.
    ///
    /// Returns `true` if the cache was replaced and `db` reloaded.
    pub fn update(&mut self, db: &Database) -> Result<bool> {
        match self.download(self.cache_path().exists())? {
            Some(_) => {
                self.load(db)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Load the cache into `db`, downloading first when it is missing or
    /// older than the expiry interval.
    ///
    /// A failed refresh of an existing cache is logged and the stale copy is
    /// used instead.
    pub fn load_or_fetch(&mut self, db: &Database) -> Result<LoadStats> {
        if !self.cache_path().exists() {
            log::info!("No cached list at {}, downloading", self.cache_path().display());
            return self.fetch(db);
        }
        if self.needs_update() {
            if let Err(e) = self.download(true) {
                log::warn!("Failed to refresh {}, using cached list: {}", self.config.url, e);
            }
        }
        self.load(db)
    }

    /// Whether the expiry interval has passed since the last update.
    pub fn needs_update(&self) -> bool {
        UpdateMetadata::load(&self.metadata_path)
            .unwrap_or_default()
            .needs_update(self.config.expire)
    }

    /// Time of the last successful update, if any.
    pub fn last_updated(&self) -> Option<SystemTime> {
        UpdateMetadata::load(&self.metadata_path)
            .ok()
            .and_then(|meta| meta.last_updated)
    }

    /// Download into the cache. Returns `None` on 304 Not Modified.
    fn download(&mut self, conditional: bool) -> Result<Option<usize>> {
        let etag = if conditional { self.etag.as_deref() } else { None };
        let (data, etag) = match download(&self.agent, &self.config.url, etag)? {
            Download::Body { data, etag } => (data, etag),
            Download::NotModified => {
                log::debug!("List not modified (304): {}", self.config.url);
                let mut meta = UpdateMetadata::load(&self.metadata_path).unwrap_or_default();
                meta.touch();
                meta.save(&self.metadata_path)?;
                return Ok(None);
            }
        };
        let rules = ensure_rules(&data, &self.config.url)?;

        if let Some(parent) = self.config.cache_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        replace_file(&self.temp_path(), self.cache_path(), &data)?;

        log::info!(
            "Downloaded {} rules ({} bytes) from {}",
            rules,
            data.len(),
            self.config.url
        );

        self.etag = etag;
        UpdateMetadata::fetched(&self.config.url, self.etag.clone(), rules)
            .save(&self.metadata_path)?;
        Ok(Some(rules))
    }
}

/// Write `data` to `temp` and rename it over `target`.
///
/// `temp` is removed if any step fails.
fn replace_file(temp: &Path, target: &Path, data: &[u8]) -> Result<()> {
    let result = (|| {
        let mut file = fs::File::create(temp)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);
        fs::rename(temp, target)
    })();
    if let Err(e) = result {
        if let Err(cleanup) = fs::remove_file(temp) {
            log::debug!("Failed to remove {}: {}", temp.display(), cleanup);
        }
        return Err(e.into());
    }
    Ok(())
}

fn download(agent: &ureq::Agent, url: &str, etag: Option<&str>) -> Result<Download> {
    let mut request = agent.get(url);
    if let Some(etag) = etag {
        request = request.set("If-None-Match", etag);
    }

    let response = match request.call() {
        Ok(response) if response.status() == 304 => return Ok(Download::NotModified),
        Ok(response) => response,
        Err(ureq::Error::Status(304, _)) => return Ok(Download::NotModified),
        Err(ureq::Error::Status(code, _)) => {
            return Err(Error::Download(format!("{}: HTTP {}", url, code)))
        }
        Err(ureq::Error::Transport(t)) => return Err(Error::Download(format!("{}: {}", url, t))),
    };

    let etag = response.header("ETag").map(str::to_string);
    let mut raw = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut raw)
        .map_err(|e| Error::Download(format!("{}: failed to read response: {}", url, e)))?;

    Ok(Download::Body {
        data: decompress(raw)?,
        etag,
    })
}

/// Reject lists without a single rule; returns the rule count.
fn ensure_rules(data: &[u8], source: &str) -> Result<usize> {
    let mut rules = 0;
    for line in RuleLines::new(data) {
        line?;
        rules += 1;
    }
    if rules == 0 {
        return Err(Error::EmptySource(source.to_string()));
    }
    Ok(rules)
}

fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

/// Gunzip `data` if it is gzip-compressed, pass it through otherwise.
fn decompress(data: Vec<u8>) -> Result<Vec<u8>> {
    if !is_gzip(&data) {
        return Ok(data);
    }
    let mut out = Vec::new();
    GzDecoder::new(&data[..])
        .read_to_end(&mut out)
        .map_err(|e| Error::Config(format!("gzip decompression failed: {}", e)))?;
    Ok(out)
}
