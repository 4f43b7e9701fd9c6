//! Turning files on disk into document inputs.
//!
//! A [`TextSource`] extracts text from one file, [`TextCache`] keeps extracted
//! text keyed by content hash, and [`load_corpus`] walks an input directory
//! and produces the [`DocumentInput`]s the comparison engine consumes.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::error::{AppError, SourceError};
use crate::models::{file_stem, DocumentInput};

/// Extracts plain text from a document file.
pub trait TextSource: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, SourceError>;

    /// Extract from bytes already read from `path`. Sources that need the
    /// file itself can keep this default.
    fn extract_from_bytes(&self, path: &Path, _bytes: &[u8]) -> Result<String, SourceError> {
        self.extract_text(path)
    }

    /// Container-level creation date, such as a PDF `D:YYYYMMDD...` string.
    fn container_date(&self, _path: &Path) -> Option<String> {
        None
    }
}

/// Reads files that already contain text.
#[derive(Debug, Clone)]
pub struct PlainTextSource {
    extensions: Vec<String>,
}

impl Default for PlainTextSource {
    fn default() -> Self {
        Self {
            extensions: vec!["txt".to_string(), "md".to_string(), "text".to_string()],
        }
    }
}

impl PlainTextSource {
    pub fn supports(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
    }
}

impl TextSource for PlainTextSource {
    fn extract_text(&self, path: &Path) -> Result<String, SourceError> {
        if !self.supports(path) {
            return Err(SourceError::Unsupported(path.to_path_buf()));
        }
        let bytes = fs::read(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.extract_from_bytes(path, &bytes)
    }

    fn extract_from_bytes(&self, path: &Path, bytes: &[u8]) -> Result<String, SourceError> {
        if !self.supports(path) {
            return Err(SourceError::Unsupported(path.to_path_buf()));
        }
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Extracted text keyed by the SHA-256 of the source file's bytes.
///
/// Entries live in memory for the run and, when a directory is configured,
/// on disk as `<stem>.<hash>.txt` so later runs skip extraction.
#[derive(Debug, Default)]
pub struct TextCache {
    dir: Option<PathBuf>,
    entries: RwLock<HashMap<String, String>>,
}

impl TextCache {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            dir,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// A cache that never touches the disk.
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    /// First 16 hex characters of the SHA-256 of `bytes`.
    pub fn content_key(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = format!("{:x}", hasher.finalize());
        digest[..16].to_string()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text of `path`, from the cache when its content was seen before.
    pub fn get_or_extract(
        &self,
        path: &Path,
        source: &dyn TextSource,
    ) -> Result<String, SourceError> {
        let bytes = fs::read(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let key = Self::content_key(&bytes);

        if let Some(text) = self.entries.read().unwrap_or_else(PoisonError::into_inner).get(&key) {
            tracing::debug!(path = %path.display(), key = %key, "Text cache hit");
            return Ok(text.clone());
        }

        let disk_path = self
            .dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.{}.txt", file_stem(path), key)));

        let text = match disk_path.as_ref().filter(|p| p.is_file()) {
            Some(cached) => {
                tracing::debug!(
                    path = %path.display(),
                    cache = %cached.display(),
                    "Text cache hit on disk"
                );
                fs::read_to_string(cached).map_err(|source| SourceError::Read {
                    path: cached.clone(),
                    source,
                })?
            }
            None => {
                let text = source.extract_from_bytes(path, &bytes)?;
                if let Some(target) = &disk_path {
                    if let Err(err) = write_entry(target, &text) {
                        tracing::warn!(error = %err, "Could not persist cache entry");
                    }
                }
                text
            }
        };

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, text.clone());
        Ok(text)
    }
}

fn write_entry(target: &Path, text: &str) -> Result<(), SourceError> {
    let io_err = |source| SourceError::CacheWrite {
        path: target.to_path_buf(),
        source,
    };
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(target, text).map_err(io_err)
}

/// Scan `dir` for documents and extract their text.
///
/// Files are visited in path order and filtered by extension
/// (case-insensitive). Files that cannot be read or are not supported by the
/// source are skipped with a warning, as are documents whose text is blank.
/// Only a missing or unreadable input directory is an error.
pub fn load_corpus(
    dir: &Path,
    extensions: &[String],
    source: &dyn TextSource,
    cache: &TextCache,
) -> Result<Vec<DocumentInput>, AppError> {
    if !dir.is_dir() {
        return Err(AppError::InputNotFound(dir.to_path_buf()));
    }

    let wanted: Vec<String> = extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect();
    let mut paths = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(AppError::Scan {
                    path: dir.to_path_buf(),
                    message: err.to_string(),
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if extension_of(&path).is_some_and(|ext| wanted.contains(&ext)) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut inputs = Vec::with_capacity(paths.len());
    for path in paths {
        let text = match cache.get_or_extract(&path, source) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Skipping document");
                continue;
            }
        };
        if text.trim().is_empty() {
            tracing::info!(path = %path.display(), "Skipping document with no text");
            continue;
        }
        let modified = match modified_time(&path) {
            Ok(modified) => modified,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Skipping document");
                continue;
            }
        };

        let mut input = DocumentInput::new(path.clone(), text, modified);
        if let Some(date) = source.container_date(&path) {
            input = input.with_container_date(date);
        }
        inputs.push(input);
    }

    tracing::info!(dir = %dir.display(), documents = inputs.len(), "Loaded corpus");
    Ok(inputs)
}

fn modified_time(path: &Path) -> Result<DateTime<Utc>, AppError> {
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|source| AppError::io(path, source))?;
    Ok(DateTime::<Utc>::from(modified))
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}
