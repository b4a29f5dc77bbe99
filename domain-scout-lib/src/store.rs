//! On-disk persistence for the membership cache.

use crate::bitmap::MembershipCache;
use crate::error::DomainScoutError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads and writes a [`MembershipCache`] at a fixed path.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted cache. A missing file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<MembershipCache>, DomainScoutError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainScoutError::file_error(
                    self.path.to_string_lossy(),
                    format!("Failed to read cache: {}", e),
                ))
            }
        };
        MembershipCache::deserialize(&bytes).map(Some)
    }

    /// Load the persisted cache, or start a fresh one of `capacity` bits.
    ///
    /// A corrupt file is reported and replaced by an empty cache. A file
    /// whose capacity differs from `capacity` is kept as-is, since every
    /// slot in it was addressed modulo its own capacity.
    pub fn load_or_fresh(&self, capacity: u64) -> Result<MembershipCache, DomainScoutError> {
        match self.load() {
            Ok(Some(cache)) => {
                if cache.capacity() != capacity {
                    tracing::warn!(
                        path = %self.path.display(),
                        file_capacity = cache.capacity(),
                        requested = capacity,
                        "cache file capacity differs from configuration, keeping file capacity"
                    );
                }
                tracing::info!(
                    path = %self.path.display(),
                    bits_set = cache.stats().bits_set,
                    "loaded membership cache"
                );
                Ok(cache)
            }
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "no cache file, starting fresh");
                MembershipCache::new(capacity)
            }
            Err(e @ DomainScoutError::CorruptState { .. }) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "cache file is corrupt, starting with an empty cache"
                );
                MembershipCache::new(capacity)
            }
            Err(e) => Err(e),
        }
    }

    /// Persist `cache`, replacing the previous file atomically.
    ///
    /// Bytes go to `<path>.tmp` first and are renamed into place, so an
    /// interrupted write leaves the last checkpoint intact.
    pub fn save(&self, cache: &MembershipCache) -> Result<(), DomainScoutError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, cache.serialize()).map_err(|e| self.write_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.write_error(e))?;

        tracing::debug!(
            path = %self.path.display(),
            bits_set = cache.stats().bits_set,
            "saved membership cache"
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_error(&self, e: std::io::Error) -> DomainScoutError {
        DomainScoutError::file_error(
            self.path.to_string_lossy(),
            format!("Failed to write cache: {}", e),
        )
    }
}
