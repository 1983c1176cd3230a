//! Catalog documents: where they come from and how they are edited
//!
//! A catalog is a JSON document `{ "lectures": [...] }`. `CatalogSource`
//! fetches one for the library; `Catalog` is the edit workflow used to add,
//! import and export lectures.

use crate::error::{CatalogError, Result};
use chrono::{DateTime, Utc};
use lectern_core::{Lecture, LectureId, LoadError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Sample catalog compiled into the binary
pub const BUNDLED_CATALOG: &str = include_str!("../data/lectures.json");

/// Catalog file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub lectures: Vec<Lecture>,
}

impl CatalogDocument {
    /// Parse a catalog document
    pub fn parse(json: &str) -> std::result::Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Where the catalog is read from at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The sample catalog shipped with the crate
    Bundled,
    /// A JSON file on disk
    File(PathBuf),
    /// A JSON document served over HTTP(S)
    Url(String),
}

impl CatalogSource {
    /// Interpret a config/CLI value: `bundled`, an `http(s)://` URL, or a path
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("bundled") {
            Self::Bundled
        } else if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    /// Fetch and parse the catalog
    pub async fn fetch(&self) -> std::result::Result<CatalogDocument, LoadError> {
        match self {
            Self::Bundled => CatalogDocument::parse(BUNDLED_CATALOG),
            Self::File(path) => {
                debug!(path = %path.display(), "Reading catalog file");
                let json = tokio::fs::read_to_string(path).await?;
                CatalogDocument::parse(&json)
            }
            Self::Url(url) => fetch_url(url).await,
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bundled => write!(f, "bundled"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

async fn fetch_url(url: &str) -> std::result::Result<CatalogDocument, LoadError> {
    debug!(url = %url, "Fetching catalog");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("Lectern/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| LoadError::unreachable(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| LoadError::unreachable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::unreachable(format!("{url} returned {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| LoadError::unreachable(e.to_string()))?;
    CatalogDocument::parse(&body)
}

// ===== Edit workflow =====

/// Fields entered for a new lecture
#[derive(Debug, Clone, Default)]
pub struct NewLecture {
    pub title: String,
    pub instructor: String,
    pub course: String,
    /// Defaults to today as "28 Aug 2025"
    pub date: Option<String>,
    pub description: String,
    /// Comma-separated
    pub tags: String,
    pub based_on: Option<String>,
    pub key: Option<String>,
    pub video_link: Option<String>,
    /// Name of the audio file being added, e.g. "My Talk (final).mp3"
    pub source_file: Option<String>,
    pub audio_url: Option<String>,
}

/// Exported catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub lectures: Vec<Lecture>,
    pub export_date: DateTime<Utc>,
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    /// Incoming lectures whose id collided and was replaced
    pub renamed: usize,
}

/// Editable catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    lectures: Vec<Lecture>,
}

impl Catalog {
    pub fn new(lectures: Vec<Lecture>) -> Self {
        Self { lectures }
    }

    pub fn from_document(document: CatalogDocument) -> Self {
        Self::new(document.lectures)
    }

    pub fn lectures(&self) -> &[Lecture] {
        &self.lectures
    }

    pub fn into_document(self) -> CatalogDocument {
        CatalogDocument {
            lectures: self.lectures,
        }
    }

    /// Read a catalog file; a missing file is an empty catalog
    pub async fn read_file(path: &Path) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(json) => {
                let document: CatalogDocument = serde_json::from_str(&json)?;
                Ok(Self::from_document(document))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the catalog as pretty JSON
    pub async fn write_file(&self, path: &Path) -> Result<()> {
        let document = CatalogDocument {
            lectures: self.lectures.clone(),
        };
        let json = serde_json::to_string_pretty(&document)?;
        tokio::fs::write(path, json).await?;
        info!(path = %path.display(), lectures = self.lectures.len(), "Catalog written");
        Ok(())
    }

    /// Append a new lecture with a generated id and sanitized filename
    pub fn add(&mut self, new: NewLecture, now: DateTime<Utc>) -> Result<&Lecture> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(CatalogError::MissingTitle);
        }

        let id = self.unique_id(now);
        let filename = new
            .source_file
            .as_deref()
            .map(|name| self.unique_filename(&sanitize_filename(name)))
            .unwrap_or_default();

        let mut lecture = Lecture::new(id, title);
        lecture.filename = filename;
        lecture.instructor = new.instructor.trim().to_string();
        lecture.course = new.course.trim().to_string();
        lecture.date = new
            .date
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| now.format("%d %b %Y").to_string());
        lecture.description = new.description.trim().to_string();
        lecture.tags = split_tags(&new.tags);
        lecture.based_on = non_empty(new.based_on);
        lecture.key = non_empty(new.key);
        lecture.video_link = non_empty(new.video_link);
        lecture.audio_url = non_empty(new.audio_url);

        info!(lecture_id = %lecture.id, title = %lecture.title, "Lecture added");
        self.lectures.push(lecture);
        let last = self.lectures.len() - 1;
        Ok(&self.lectures[last])
    }

    /// Append lectures from another catalog
    ///
    /// Incoming ids that collide with existing ones get a fresh
    /// `imported-<uuid>` id. Audio URLs are not carried over.
    pub fn import(&mut self, document: CatalogDocument) -> ImportSummary {
        let mut taken: HashSet<LectureId> = self.lectures.iter().map(|l| l.id.clone()).collect();
        let mut summary = ImportSummary::default();

        for mut lecture in document.lectures {
            if taken.contains(&lecture.id) {
                let fresh = LectureId::imported();
                debug!(from = %lecture.id, to = %fresh, "Renaming imported lecture");
                lecture.id = fresh;
                summary.renamed += 1;
            }
            lecture.audio_url = None;
            taken.insert(lecture.id.clone());
            self.lectures.push(lecture);
            summary.added += 1;
        }

        info!(added = summary.added, renamed = summary.renamed, "Catalog imported");
        summary
    }

    /// Snapshot for sharing, without audio URLs
    pub fn export(&self, now: DateTime<Utc>) -> ExportDocument {
        ExportDocument {
            lectures: self
                .lectures
                .iter()
                .cloned()
                .map(|mut lecture| {
                    lecture.audio_url = None;
                    lecture
                })
                .collect(),
            export_date: now,
        }
    }

    /// `lecture_YYYYMMDD_HHMMSS`, suffixed `_2`, `_3`, ... if taken
    fn unique_id(&self, now: DateTime<Utc>) -> LectureId {
        let base = format!("lecture_{}", now.format("%Y%m%d_%H%M%S"));
        let taken = |candidate: &str| self.lectures.iter().any(|l| l.id.as_str() == candidate);

        if !taken(&base) {
            return LectureId::new(base);
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if !taken(&candidate) {
                return LectureId::new(candidate);
            }
            n += 1;
        }
    }

    /// `name.ext`, then `name_1.ext`, `name_2.ext`, ... if taken
    fn unique_filename(&self, filename: &str) -> String {
        let taken = |candidate: &str| self.lectures.iter().any(|l| l.filename == candidate);
        if !taken(filename) {
            return filename.to_string();
        }

        let (stem, ext) = split_extension(filename);
        let mut n = 1;
        loop {
            let candidate = format!("{stem}_{n}{ext}");
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Replace every character outside `[A-Za-z0-9_-]` in the stem with `_`
pub fn sanitize_filename(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name);
    let (stem, ext) = split_extension(base);
    let clean: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{clean}{ext}")
}

/// Split on commas, trim, drop empties
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// ("talk", ".mp3"); a leading dot is part of the stem
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
