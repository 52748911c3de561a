//! Picture sources - local directories and remote JSON candidate lists

use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::application::errors::{BotError, StorageError};

/// Browser-like user agent sent on picture fetches
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// The only deadline in the system
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Shared blocking client; a builder failure disables network sources
static HTTP: Lazy<Option<reqwest::blocking::Client>> = Lazy::new(|| {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| tracing::error!("Failed to build HTTP client: {}", e))
        .ok()
});

/// Where candidate pictures come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PictureSource {
    /// Local directory, listed non-recursively
    Directory(PathBuf),
    /// Remote JSON document listing candidate URLs
    RemoteList(String),
}

impl PictureSource {
    /// Scheme-prefixed sources name remote lists, everything else is a directory
    /// resolved against `base_dir` when not already absolute
    pub fn parse(raw: &str, base_dir: &Path) -> Self {
        if is_remote(raw) {
            return PictureSource::RemoteList(raw.to_string());
        }
        let path = PathBuf::from(raw);
        if path.is_absolute() {
            PictureSource::Directory(path)
        } else {
            PictureSource::Directory(base_dir.join(path))
        }
    }
}

/// Raw bytes plus the MIME type derived from the reference's extension
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

/// Lists candidate picture references for configured sources
pub struct SourceLister {
    base_dir: PathBuf,
    cache_dir: PathBuf,
}

impl SourceLister {
    pub fn new(base_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            cache_dir: cache_dir.into(),
        }
    }

    /// Candidate references for a source; every failure logs and yields none
    pub fn list_candidates(&self, source: &str) -> Vec<String> {
        match PictureSource::parse(source, &self.base_dir) {
            PictureSource::Directory(dir) => list_directory(&dir),
            PictureSource::RemoteList(url) => self.list_remote(&url),
        }
    }

    /// Remote lists are fetched at most once per distinct URL: the raw body is
    /// persisted under the cache dir keyed by the URL's basename, and reused
    /// for as long as the file exists
    fn list_remote(&self, url: &str) -> Vec<String> {
        let cache_path = self.cache_dir.join(cache_file_name(url));

        if !cache_path.exists() {
            let body = match fetch_list(url) {
                Ok(body) => body,
                Err(e) => {
                    tracing::error!("Failed to fetch candidate list {}: {}", url, e);
                    return Vec::new();
                }
            };
            if let Err(e) = std::fs::create_dir_all(&self.cache_dir)
                .and_then(|_| std::fs::write(&cache_path, &body))
            {
                tracing::error!("Failed to cache candidate list {}: {}", cache_path.display(), e);
                return Vec::new();
            }
            tracing::debug!("Cached candidate list {} at {}", url, cache_path.display());
        }

        let raw = match std::fs::read_to_string(&cache_path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Failed to read cached list {}: {}", cache_path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Array(items)) => items
                .iter()
                .map(|item| match item.as_str() {
                    Some(s) => s.to_string(),
                    None => item.to_string(),
                })
                .collect(),
            Ok(_) => {
                tracing::error!("Candidate list {} is not a JSON array", url);
                Vec::new()
            }
            Err(e) => {
                tracing::error!("Failed to parse cached list {}: {}", cache_path.display(), e);
                Vec::new()
            }
        }
    }
}

/// Directory entries with a supported image extension, non-recursive
fn list_directory(dir: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Failed to list picture directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut found = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() && has_image_extension(&path) {
            found.push(path.to_string_lossy().into_owned());
        }
    }
    found.sort();
    found
}

/// Fetch one candidate: a bounded GET for remote references, a direct read
/// for local paths
pub fn fetch_image(reference: &str) -> Result<FetchedImage, BotError> {
    if is_remote(reference) {
        let client = HTTP
            .as_ref()
            .ok_or_else(|| BotError::Network("HTTP client unavailable".to_string()))?;
        let response = client
            .get(reference)
            .send()
            .map_err(|e| BotError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(BotError::Network(format!("HTTP error: {}", response.status())));
        }
        let bytes = response
            .bytes()
            .map_err(|e| BotError::Network(e.to_string()))?;
        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            mime: mime_for(reference, true),
        })
    } else {
        let bytes = std::fs::read(reference).map_err(StorageError::Io)?;
        Ok(FetchedImage {
            bytes,
            mime: mime_for(reference, false),
        })
    }
}

fn fetch_list(url: &str) -> Result<Vec<u8>, BotError> {
    let client = HTTP
        .as_ref()
        .ok_or_else(|| BotError::Network("HTTP client unavailable".to_string()))?;
    let response = client
        .get(url)
        .send()
        .map_err(|e| BotError::Network(e.to_string()))?;
    if !response.status().is_success() {
        return Err(BotError::Network(format!("HTTP error: {}", response.status())));
    }
    let bytes = response
        .bytes()
        .map_err(|e| BotError::Network(e.to_string()))?;
    Ok(bytes.to_vec())
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Cache file name: the URL's trailing path segment, query string stripped
fn cache_file_name(url: &str) -> String {
    let name = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
        .split('?')
        .next()
        .unwrap_or("");
    if name.is_empty() {
        "list.json".to_string()
    } else {
        name.to_string()
    }
}

/// Extension-to-MIME mapping; webp is only recognized for local files
fn mime_for(reference: &str, remote: bool) -> &'static str {
    let ext = reference
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" if !remote => "image/webp",
        _ => "image/jpeg",
    }
}
