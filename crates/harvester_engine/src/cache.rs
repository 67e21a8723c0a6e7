//! On-disk response cache keyed by normalized URL.
//!
//! Each entry is two files under the cache directory: `{key}.body` with the raw
//! response bytes and `{key}.json` with the metadata. The metadata file is
//! written last, so an entry without it is treated as a miss.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine_logging::{engine_debug, engine_warn};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::filename::cache_key;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::{FetchError, FetchMetadata, FetchOutput, Fetcher};

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] io::Error),
    #[error("cache persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("cache metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedMetadata {
    url: String,
    final_url: String,
    redirect_count: usize,
    content_type: Option<String>,
}

/// Drops the fragment and lets `url` canonicalize scheme, host and default
/// port. Unparseable input is used verbatim.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => raw.trim().to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn paths(&self, url: &str) -> (PathBuf, PathBuf, String) {
        let key = cache_key(&normalize_url(url));
        (
            self.dir.join(format!("{key}.body")),
            self.dir.join(format!("{key}.json")),
            key,
        )
    }

    pub fn get(&self, url: &str) -> Result<Option<FetchOutput>, CacheError> {
        let (body_path, meta_path, _) = self.paths(url);
        let meta_text = match fs::read_to_string(&meta_path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let meta: CachedMetadata = serde_json::from_str(&meta_text)?;
        let bytes = match fs::read(&body_path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(FetchOutput {
            metadata: FetchMetadata {
                original_url: meta.url,
                final_url: meta.final_url,
                redirect_count: meta.redirect_count,
                content_type: meta.content_type,
                byte_len: bytes.len() as u64,
                from_cache: true,
            },
            bytes,
        }))
    }

    pub fn put(&self, url: &str, output: &FetchOutput) -> Result<(), CacheError> {
        let (_, _, key) = self.paths(url);
        let writer = AtomicFileWriter::new(&self.dir);
        writer.write(&format!("{key}.body"), &output.bytes)?;
        let meta = CachedMetadata {
            url: url.to_string(),
            final_url: output.metadata.final_url.clone(),
            redirect_count: output.metadata.redirect_count,
            content_type: output.metadata.content_type.clone(),
        };
        writer.write(&format!("{key}.json"), serde_json::to_string(&meta)?)?;
        Ok(())
    }

    /// Removes every cached entry; returns how many files were deleted.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err.into()),
        };
        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            let is_entry = matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("body" | "json")
            );
            if is_entry && path.is_file() {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Serves successful page fetches from a [`DiskCache`] before asking `inner`.
pub struct CachedFetcher<F> {
    inner: F,
    cache: DiskCache,
}

impl<F: Fetcher> CachedFetcher<F> {
    pub fn new(inner: F, cache: DiskCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &DiskCache {
        &self.cache
    }
}

#[async_trait::async_trait]
impl<F: Fetcher> Fetcher for CachedFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        match self.cache.get(url) {
            Ok(Some(hit)) => {
                engine_debug!("Cache hit {}", url);
                return Ok(hit);
            }
            Ok(None) => engine_debug!("Cache miss {}", url),
            Err(err) => engine_warn!("Ignoring unreadable cache entry for {}: {}", url, err),
        }

        let output = self.inner.fetch(url).await?;
        if let Err(err) = self.cache.put(url, &output) {
            engine_warn!("Failed to cache response for {}: {}", url, err);
        }
        Ok(output)
    }

    async fn download(&self, url: &str, target: &Path) -> Result<u64, FetchError> {
        self.inner.download(url, target).await
    }
}
