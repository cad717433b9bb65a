// Filesystem response cache.
// One JSON file per request fingerprint, written atomically, with an optional TTL.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use tracing::warn;

use super::{ResponseCache, fingerprint};
use crate::request::descriptor::RequestDescriptor;

/// Entries younger than this are served; older ones are treated as misses.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Wrapper for cached data with its write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

impl<T> CachedEntry<T> {
    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        let Some(ttl) = ttl else {
            return false;
        };
        let elapsed = Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);
        elapsed > ttl
    }
}

/// Cache rooted at a directory, reusable across processes.
///
/// Reads that fail for any reason are misses; writes that fail are logged and
/// dropped. The cache is an accelerator, never a source of truth.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
    ttl: Option<Duration>,
}

impl FileCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ttl: Some(DEFAULT_TTL),
        }
    }

    /// Cache under the platform cache directory (~/.cache/<application> on Linux).
    pub fn in_project_dirs(application: &str) -> Option<Self> {
        ProjectDirs::from("", "", application).map(|dirs| Self::new(dirs.cache_dir()))
    }

    /// Override the TTL; `None` keeps entries forever.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    // Fingerprints contain URL punctuation, so filenames are their digest.
    fn entry_path(&self, descriptor: &RequestDescriptor) -> PathBuf {
        let digest = Sha1::digest(fingerprint(descriptor).as_bytes());
        let name = digest
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<String>();
        self.root.join(format!("{name}.json"))
    }
}

fn read_entry<T: DeserializeOwned>(path: &Path) -> Option<CachedEntry<T>> {
    if !path.exists() {
        return None;
    }
    let contents = fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

// Written atomically via temp file so readers never observe a partial entry.
fn write_entry<T: Serialize>(path: &Path, entry: &CachedEntry<T>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(entry)?;

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

impl<T: Serialize + DeserializeOwned + Send> ResponseCache<T> for FileCache {
    fn try_get(&self, descriptor: &RequestDescriptor) -> Option<T> {
        let entry = read_entry::<T>(&self.entry_path(descriptor))?;
        if entry.is_expired(self.ttl) {
            return None;
        }
        Some(entry.data)
    }

    fn set(&self, descriptor: &RequestDescriptor, value: &T) {
        let path = self.entry_path(descriptor);
        let entry = CachedEntry {
            data: value,
            cached_at: Utc::now(),
        };
        if let Err(error) = write_entry(&path, &entry) {
            warn!(path = %path.display(), %error, "dropping cache write");
        }
    }
}
