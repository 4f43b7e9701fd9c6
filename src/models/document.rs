//! Document models for the comparison pipeline.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Raw input record handed to the engine by the corpus loader.
///
/// `text` may be empty; the loader is expected to drop empty documents before
/// they get here, but the engine treats an empty string as valid text.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    /// Path of the source file. Unique key of the document.
    pub path: PathBuf,
    /// Extracted text.
    pub text: String,
    /// Last-modified time of the source file.
    pub modified: DateTime<Utc>,
    /// Container-level creation date, e.g. a PDF `D:20231215...` string.
    pub container_date: Option<String>,
}

impl DocumentInput {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>, modified: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            modified,
            container_date: None,
        }
    }

    /// Attach a container creation date.
    pub fn with_container_date(mut self, date: impl Into<String>) -> Self {
        self.container_date = Some(date.into());
        self
    }
}

/// A document whose date has been resolved.
///
/// Built once per input; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Path of the source file.
    pub path: PathBuf,
    /// Extracted text (not serialized).
    #[serde(skip)]
    pub text: String,
    /// Canonical date, or `None` for the unknown bucket.
    pub date: Option<NaiveDate>,
    /// Last-modified time. Used for ordering inside a date group only.
    pub modified: DateTime<Utc>,
}

impl Document {
    /// Identifier shown in reports.
    pub fn id(&self) -> String {
        self.path.display().to_string()
    }

    /// File stem, used to name pair report pages.
    pub fn stem(&self) -> String {
        file_stem(&self.path)
    }

}

/// Final path component, used for filename date extraction and tagging.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}
